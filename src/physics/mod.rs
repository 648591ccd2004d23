//! Rigid-body engine boundary
//!
//! The gameplay loop only needs a handful of body operations. Any engine that
//! can create fixed, kinematic, and dynamic bodies and step them can sit behind
//! these traits. A Rapier implementation is provided with the `physics`
//! feature.

use glam::{Quat, Vec3};

#[cfg(feature = "physics")]
pub mod rapier;

#[cfg(test)]
pub(crate) mod mock;

#[cfg(feature = "physics")]
pub use rapier::RapierWorld;

/// The kind of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Immovable (floors, walls)
    Fixed,
    /// Pose driven by next-target commands each tick
    Kinematic,
    /// Driven by forces and impulses
    Dynamic,
}

/// Collider shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Ball { radius: f32 },
    /// Full extents
    Cuboid { size: Vec3 },
}

/// Description of a body to create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub translation: Vec3,
    pub rotation: Quat,
    pub shape: Shape,
    pub restitution: f32,
    pub friction: f32,
}

impl BodyDesc {
    pub fn new(kind: BodyKind, shape: Shape) -> Self {
        Self {
            kind,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            shape,
            restitution: 0.0,
            friction: 0.5,
        }
    }

    pub fn fixed_cuboid(center: Vec3, size: Vec3) -> Self {
        Self::new(BodyKind::Fixed, Shape::Cuboid { size }).with_translation(center)
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }
}

/// Operations on a single body
pub trait RigidBodyOps {
    fn translation(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn linear_velocity(&self) -> Vec3;
    fn apply_impulse(&mut self, impulse: Vec3, wake: bool);
    fn set_translation(&mut self, translation: Vec3, wake: bool);
    fn set_linear_velocity(&mut self, velocity: Vec3, wake: bool);
    /// Motion target for a kinematic body; reached on the next step
    fn set_next_kinematic_translation(&mut self, translation: Vec3);
    fn set_next_kinematic_rotation(&mut self, rotation: Quat);
}

/// A world that owns bodies and advances them
pub trait PhysicsWorld {
    type Handle: Copy + Eq + std::fmt::Debug;
    type Body: RigidBodyOps;

    fn spawn(&mut self, desc: &BodyDesc) -> Self::Handle;
    fn despawn(&mut self, handle: Self::Handle);
    fn body(&self, handle: Self::Handle) -> Option<&Self::Body>;
    fn body_mut(&mut self, handle: Self::Handle) -> Option<&mut Self::Body>;
    fn step(&mut self, dt: f32);
}
