//! A generated course instantiated in a physics world
//!
//! Building is split from spawning: the layout and every obstacle's phase
//! offset are fixed before the first body is created.

use super::blocks::{BlockCatalog, BlockKind};
use super::layout::{Layout, Surface};
use super::obstacle::{Obstacle, ObstacleKind};
use super::rng::RandomSequence;
use crate::physics::{BodyDesc, BodyKind, PhysicsWorld, RigidBodyOps, Shape};

const OBSTACLE_RESTITUTION: f32 = 0.2;
const OBSTACLE_FRICTION: f32 = 0.0;
const WALL_RESTITUTION: f32 = 0.2;
const WALL_FRICTION: f32 = 0.0;
const FLOOR_FRICTION: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Level<H> {
    pub seed: u64,
    pub sequence: Vec<BlockKind>,
    pub layout: Layout,
    /// Obstacle arena, in course order
    pub obstacles: Vec<Obstacle<H>>,
    statics: Vec<H>,
}

impl<H: Copy + Eq + std::fmt::Debug> Level<H> {
    /// Generate the course for `seed` without touching any physics world
    pub fn build(count: u32, candidates: &[BlockKind], catalog: &BlockCatalog, seed: u64) -> Self {
        let mut rng = RandomSequence::new(seed);
        let sequence = rng.generate(count, candidates);
        let layout = Layout::compute(&sequence, catalog);

        let obstacles = layout
            .blocks
            .iter()
            .enumerate()
            .filter_map(|(block_index, block)| {
                let kind = ObstacleKind::for_block(&block.kind)?;
                let phase_offset = if kind.uses_phase_offset() {
                    rng.phase_offset()
                } else {
                    0.0
                };
                Some(Obstacle {
                    block_index,
                    kind,
                    base: block.position,
                    phase_offset,
                    body: None,
                })
            })
            .collect();

        Self {
            seed,
            sequence,
            layout,
            obstacles,
            statics: Vec::new(),
        }
    }

    /// Whether bodies currently exist for this level
    pub fn is_spawned(&self) -> bool {
        !self.statics.is_empty()
    }

    /// Create fixed bodies for the course and kinematic bodies for obstacles
    pub fn spawn<W: PhysicsWorld<Handle = H>>(&mut self, world: &mut W) {
        if self.is_spawned() {
            log::warn!("Level {} already spawned", self.seed);
            return;
        }

        for collider in self.layout.static_colliders() {
            let desc = BodyDesc::fixed_cuboid(collider.center, collider.size);
            let desc = match collider.surface {
                Surface::Floor => desc.with_friction(FLOOR_FRICTION),
                Surface::Wall => desc
                    .with_restitution(WALL_RESTITUTION)
                    .with_friction(WALL_FRICTION),
            };
            self.statics.push(world.spawn(&desc));
        }

        for obstacle in &mut self.obstacles {
            let pose = obstacle.rest_pose();
            let desc = BodyDesc::new(
                BodyKind::Kinematic,
                Shape::Cuboid {
                    size: obstacle.kind.size(),
                },
            )
            .with_translation(pose.translation)
            .with_rotation(pose.rotation)
            .with_restitution(OBSTACLE_RESTITUTION)
            .with_friction(OBSTACLE_FRICTION);
            obstacle.body = Some(world.spawn(&desc));
        }

        log::info!(
            "Spawned level seed {}: {} blocks, {} obstacles, length {:.2}",
            self.seed,
            self.layout.blocks.len(),
            self.obstacles.len(),
            self.layout.bounds.length
        );
    }

    /// Push every obstacle's pose at `elapsed` as its next kinematic target
    pub fn animate<W: PhysicsWorld<Handle = H>>(&self, world: &mut W, elapsed: f32) {
        for obstacle in &self.obstacles {
            let Some(handle) = obstacle.body else {
                continue;
            };
            let Some(body) = world.body_mut(handle) else {
                continue;
            };
            let pose = obstacle.pose(elapsed);
            body.set_next_kinematic_translation(pose.translation);
            body.set_next_kinematic_rotation(pose.rotation);
        }
    }

    /// Remove every body this level created
    pub fn despawn<W: PhysicsWorld<Handle = H>>(&mut self, world: &mut W) {
        for handle in self.statics.drain(..) {
            world.despawn(handle);
        }
        for obstacle in &mut self.obstacles {
            if let Some(handle) = obstacle.body.take() {
                world.despawn(handle);
            }
        }
    }
}
