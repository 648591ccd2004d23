//! Linear course layout
//!
//! Blocks are laid end to end along -Z, starting with the Start block centred
//! on the origin and finishing with the End block. Side walls span the whole
//! course.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::blocks::{BlockCatalog, BlockKind};
use crate::consts::{FLOOR_THICKNESS, WALL_HEIGHT, WALL_THICKNESS};

/// A block positioned on the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub kind: BlockKind,
    pub position: Vec3,
    pub depth: f32,
    pub width: f32,
}

/// Overall course extent, used to size the side walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseBounds {
    pub length: f32,
    pub center_z: f32,
    pub floor_width: f32,
}

/// Contact material of a static collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Floor,
    /// Slippery and slightly bouncy
    Wall,
}

/// A fixed cuboid collider (full extents, world position)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    pub center: Vec3,
    pub size: Vec3,
    pub surface: Surface,
}

/// Start block, generated sequence, End block, and bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub blocks: Vec<PlacedBlock>,
    pub bounds: CourseBounds,
}

impl Layout {
    /// Place `sequence` between a Start and an End block
    pub fn compute(sequence: &[BlockKind], catalog: &BlockCatalog) -> Self {
        let start = catalog.spec(&BlockKind::Start);
        let end = catalog.spec(&BlockKind::End);

        let mut blocks = Vec::with_capacity(sequence.len() + 2);
        blocks.push(PlacedBlock {
            kind: BlockKind::Start,
            position: Vec3::ZERO,
            depth: start.depth,
            width: start.width,
        });

        let mut z = 0.0;
        let mut last_depth = start.depth;
        for kind in sequence.iter().chain(std::iter::once(&BlockKind::End)) {
            let spec = catalog.spec(kind);
            z -= last_depth / 2.0 + spec.depth / 2.0;
            blocks.push(PlacedBlock {
                kind: kind.clone(),
                position: Vec3::new(0.0, 0.0, z),
                depth: spec.depth,
                width: spec.width,
            });
            last_depth = spec.depth;
        }

        let front_z = start.depth / 2.0;
        let back_z = z - end.depth / 2.0;
        let bounds = CourseBounds {
            length: front_z - back_z,
            center_z: (front_z + back_z) / 2.0,
            floor_width: start.width,
        };

        log::debug!(
            "Laid out {} blocks, length {:.2}, center {:.2}",
            blocks.len(),
            bounds.length,
            bounds.center_z
        );

        Self { blocks, bounds }
    }

    pub fn start(&self) -> &PlacedBlock {
        &self.blocks[0]
    }

    pub fn end(&self) -> &PlacedBlock {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Blocks generated between Start and End
    pub fn sequence(&self) -> &[PlacedBlock] {
        &self.blocks[1..self.blocks.len() - 1]
    }

    /// Every fixed cuboid the course needs: floors, finish wall, side walls
    pub fn static_colliders(&self) -> Vec<StaticCollider> {
        let mut colliders: Vec<StaticCollider> = self
            .blocks
            .iter()
            .map(|block| StaticCollider {
                center: block.position,
                size: Vec3::new(block.width, FLOOR_THICKNESS, block.depth),
                surface: Surface::Floor,
            })
            .collect();

        let end = self.end();
        colliders.push(StaticCollider {
            center: end.position + Vec3::new(0.0, WALL_HEIGHT / 2.0, -2.5),
            size: Vec3::new(end.width, WALL_HEIGHT, WALL_THICKNESS),
            surface: Surface::Wall,
        });

        let wall_x = self.bounds.floor_width / 2.0 + WALL_THICKNESS / 2.0;
        for side in [1.0, -1.0] {
            colliders.push(StaticCollider {
                center: Vec3::new(side * wall_x, WALL_HEIGHT / 2.0, self.bounds.center_z),
                size: Vec3::new(WALL_THICKNESS, WALL_HEIGHT, self.bounds.length),
                surface: Surface::Wall,
            });
        }

        colliders
    }
}
