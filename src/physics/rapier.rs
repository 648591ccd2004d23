//! Rapier 3D implementation of the physics boundary

use glam::{Quat, Vec3};
use rapier3d::na;
use rapier3d::prelude::*;

use super::{BodyDesc, BodyKind, PhysicsWorld, RigidBodyOps, Shape};

// ---------------------------------------------------------------------------
// Conversion helpers (private), glam to nalgebra
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn na_to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> Rotation<Real> {
    na::UnitQuaternion::new_normalize(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

fn body_type(kind: BodyKind) -> RigidBodyType {
    match kind {
        BodyKind::Fixed => RigidBodyType::Fixed,
        BodyKind::Kinematic => RigidBodyType::KinematicPositionBased,
        BodyKind::Dynamic => RigidBodyType::Dynamic,
    }
}

fn collider_builder(shape: Shape) -> ColliderBuilder {
    match shape {
        Shape::Ball { radius } => ColliderBuilder::ball(radius),
        Shape::Cuboid { size } => ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
    }
}

impl RigidBodyOps for RigidBody {
    fn translation(&self) -> Vec3 {
        na_to_vec3(RigidBody::translation(self))
    }

    fn rotation(&self) -> Quat {
        let q = RigidBody::rotation(self);
        Quat::from_xyzw(q.i, q.j, q.k, q.w)
    }

    fn linear_velocity(&self) -> Vec3 {
        na_to_vec3(RigidBody::linvel(self))
    }

    fn apply_impulse(&mut self, impulse: Vec3, wake: bool) {
        RigidBody::apply_impulse(self, vec3_to_na(impulse), wake);
    }

    fn set_translation(&mut self, translation: Vec3, wake: bool) {
        RigidBody::set_translation(self, vec3_to_na(translation), wake);
    }

    fn set_linear_velocity(&mut self, velocity: Vec3, wake: bool) {
        self.set_linvel(vec3_to_na(velocity), wake);
    }

    fn set_next_kinematic_translation(&mut self, translation: Vec3) {
        RigidBody::set_next_kinematic_translation(self, vec3_to_na(translation));
    }

    fn set_next_kinematic_rotation(&mut self, rotation: Quat) {
        RigidBody::set_next_kinematic_rotation(self, quat_to_na(rotation));
    }
}

// ---------------------------------------------------------------------------
// RapierWorld
// ---------------------------------------------------------------------------

/// Owns every Rapier set and pipeline needed to step a scene
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new(crate::consts::GRAVITY)
    }
}

impl PhysicsWorld for RapierWorld {
    type Handle = RigidBodyHandle;
    type Body = RigidBody;

    fn spawn(&mut self, desc: &BodyDesc) -> RigidBodyHandle {
        let position = Isometry::from_parts(
            na::Translation3::new(desc.translation.x, desc.translation.y, desc.translation.z),
            quat_to_na(desc.rotation),
        );
        let rb = RigidBodyBuilder::new(body_type(desc.kind))
            .position(position)
            .ccd_enabled(desc.kind == BodyKind::Dynamic)
            .build();
        let handle = self.bodies.insert(rb);

        let collider = collider_builder(desc.shape)
            .restitution(desc.restitution)
            .friction(desc.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    fn despawn(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }
}
