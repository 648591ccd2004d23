//! Kinematic obstacle motion
//!
//! Each moving obstacle is a kinematic body whose pose is a pure function of
//! elapsed time, the block position, and a phase offset drawn once when the
//! obstacle is created.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::blocks::BlockKind;

const SPINNER_ANGULAR_SPEED: f32 = 1.35;
const SPINNER_MOUNT_HEIGHT: f32 = 0.3;
const LIMBO_LIFT: f32 = 1.2;
const AXE_SWING: f32 = 1.777;
const AXE_MOUNT_HEIGHT: f32 = 0.75;

/// Target pose for a kinematic body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

/// Moving obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Spinner,
    Limbo,
    Axe,
}

impl ObstacleKind {
    /// The obstacle that sits on a block of this kind, if any
    pub fn for_block(kind: &BlockKind) -> Option<Self> {
        match kind {
            BlockKind::Spinner => Some(ObstacleKind::Spinner),
            BlockKind::Limbo => Some(ObstacleKind::Limbo),
            BlockKind::Axe => Some(ObstacleKind::Axe),
            _ => None,
        }
    }

    /// Whether instances need their own phase offset
    pub fn uses_phase_offset(self) -> bool {
        matches!(self, ObstacleKind::Axe)
    }

    /// Full extents of the obstacle's cuboid collider
    pub fn size(self) -> Vec3 {
        match self {
            ObstacleKind::Spinner => Vec3::new(3.5, 0.3, 0.3),
            ObstacleKind::Limbo => Vec3::new(5.0, 0.3, 0.3),
            ObstacleKind::Axe => Vec3::new(2.0, 1.5, 0.3),
        }
    }

    /// Pose at `elapsed` seconds for an obstacle on a block at `base`
    pub fn pose(self, elapsed: f32, base: Vec3, phase_offset: f32) -> Pose {
        match self {
            ObstacleKind::Spinner => Pose {
                translation: base + Vec3::new(0.0, SPINNER_MOUNT_HEIGHT, 0.0),
                rotation: Quat::from_rotation_y(elapsed * SPINNER_ANGULAR_SPEED),
            },
            ObstacleKind::Limbo => Pose {
                translation: Vec3::new(base.x, base.y + elapsed.sin() + LIMBO_LIFT, base.z),
                rotation: Quat::IDENTITY,
            },
            ObstacleKind::Axe => Pose {
                translation: Vec3::new(
                    base.x + (elapsed + phase_offset).sin() * AXE_SWING,
                    base.y + AXE_MOUNT_HEIGHT,
                    base.z,
                ),
                rotation: Quat::IDENTITY,
            },
        }
    }
}

/// One obstacle instance in the level's arena
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle<H> {
    /// Index into the layout's block list
    pub block_index: usize,
    pub kind: ObstacleKind,
    pub base: Vec3,
    /// Fixed for the lifetime of the instance
    pub phase_offset: f32,
    /// Physics body, once spawned
    pub body: Option<H>,
}

impl<H> Obstacle<H> {
    pub fn pose(&self, elapsed: f32) -> Pose {
        self.kind.pose(elapsed, self.base, self.phase_offset)
    }

    /// Pose at creation time, used as the body's initial transform
    pub fn rest_pose(&self) -> Pose {
        self.pose(0.0)
    }
}
