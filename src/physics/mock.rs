//! Minimal in-memory world for unit tests
//!
//! Unit mass, no collisions. Dynamic bodies integrate velocity (and optional
//! gravity); kinematic bodies jump to their next target on step.

use glam::{Quat, Vec3};

use super::{BodyDesc, BodyKind, PhysicsWorld, RigidBodyOps};

#[derive(Debug, Clone)]
pub struct MockBody {
    pub desc: BodyDesc,
    pub translation: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub next_translation: Option<Vec3>,
    pub next_rotation: Option<Quat>,
    /// Every impulse applied, in order
    pub impulses: Vec<Vec3>,
}

impl RigidBodyOps for MockBody {
    fn translation(&self) -> Vec3 {
        self.translation
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn apply_impulse(&mut self, impulse: Vec3, _wake: bool) {
        self.impulses.push(impulse);
        self.velocity += impulse;
    }

    fn set_translation(&mut self, translation: Vec3, _wake: bool) {
        self.translation = translation;
    }

    fn set_linear_velocity(&mut self, velocity: Vec3, _wake: bool) {
        self.velocity = velocity;
    }

    fn set_next_kinematic_translation(&mut self, translation: Vec3) {
        self.next_translation = Some(translation);
    }

    fn set_next_kinematic_rotation(&mut self, rotation: Quat) {
        self.next_rotation = Some(rotation);
    }
}

#[derive(Debug, Default)]
pub struct MockWorld {
    pub bodies: Vec<Option<MockBody>>,
    pub gravity: Vec3,
    pub steps: u32,
}

impl MockWorld {
    pub fn live_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_some()).count()
    }

    pub fn count_kind(&self, kind: BodyKind) -> usize {
        self.bodies
            .iter()
            .flatten()
            .filter(|b| b.desc.kind == kind)
            .count()
    }
}

impl PhysicsWorld for MockWorld {
    type Handle = usize;
    type Body = MockBody;

    fn spawn(&mut self, desc: &BodyDesc) -> usize {
        self.bodies.push(Some(MockBody {
            desc: *desc,
            translation: desc.translation,
            rotation: desc.rotation,
            velocity: Vec3::ZERO,
            next_translation: None,
            next_rotation: None,
            impulses: Vec::new(),
        }));
        self.bodies.len() - 1
    }

    fn despawn(&mut self, handle: usize) {
        if let Some(slot) = self.bodies.get_mut(handle) {
            *slot = None;
        }
    }

    fn body(&self, handle: usize) -> Option<&MockBody> {
        self.bodies.get(handle).and_then(Option::as_ref)
    }

    fn body_mut(&mut self, handle: usize) -> Option<&mut MockBody> {
        self.bodies.get_mut(handle).and_then(Option::as_mut)
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        let gravity = self.gravity;
        for body in self.bodies.iter_mut().flatten() {
            match body.desc.kind {
                BodyKind::Fixed => {}
                BodyKind::Kinematic => {
                    if let Some(t) = body.next_translation.take() {
                        body.translation = t;
                    }
                    if let Some(r) = body.next_rotation.take() {
                        body.rotation = r;
                    }
                }
                BodyKind::Dynamic => {
                    body.velocity += gravity * dt;
                    body.translation += body.velocity * dt;
                }
            }
        }
    }
}
