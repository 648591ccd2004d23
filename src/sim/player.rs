//! Player marble controller
//!
//! Runs once per tick: turns held directions into impulses, gates jumps on
//! near-zero vertical velocity, smooths the follow camera, and checks the
//! finish line and fall limit. Every body operation is skipped while the
//! body handle is missing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::consts::*;
use crate::physics::RigidBodyOps;
use crate::{finish_line_z, smoothing_alpha};

/// Smoothed follow camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: CAMERA_OFFSET,
            target: CAMERA_TARGET_OFFSET,
        }
    }
}

impl CameraRig {
    /// Ease toward the body, independent of frame rate
    pub fn follow(&mut self, body: Vec3, dt: f32) {
        let desired_position = body + CAMERA_OFFSET;
        let desired_target = body + CAMERA_TARGET_OFFSET;

        self.position = self
            .position
            .lerp(desired_position, smoothing_alpha(CAMERA_POSITION_SMOOTHING, dt));
        self.target = self
            .target
            .lerp(desired_target, smoothing_alpha(CAMERA_TARGET_SMOOTHING, dt));
    }

    /// Jump back to the start view
    pub fn snap(&mut self) {
        *self = Self::default();
    }
}

/// What happened during one controller frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub started: bool,
    pub jumped: bool,
    pub finished: bool,
    pub fell: bool,
    /// External reset signal consumed
    pub reset: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    pub camera: CameraRig,
    /// Scale diagonal input down to the axis-aligned impulse
    pub normalize_movement: bool,
}

impl PlayerController {
    pub fn new(normalize_movement: bool) -> Self {
        Self {
            camera: CameraRig::default(),
            normalize_movement,
        }
    }

    /// Advance one tick
    pub fn frame<B: RigidBodyOps>(
        &mut self,
        mut body: Option<&mut B>,
        state: &mut GameState,
        input: &TickInput,
        delta: f32,
        now: f64,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        if state.take_reset() {
            self.reset(body.as_deref_mut(), state);
            report.reset = true;
        }

        if input.wants_start() && state.phase() == GamePhase::Ready {
            report.started = state.start(now);
        }

        let Some(body) = body else {
            return report;
        };

        if input.jump {
            report.jumped = self.jump(body);
        }

        let impulse = self.movement_impulse(input, delta);
        if impulse != Vec3::ZERO {
            body.apply_impulse(impulse, true);
        }

        let position = body.translation();
        self.camera.follow(position, delta);

        if state.phase() == GamePhase::Playing {
            if position.z < finish_line_z(state.block_count()) {
                report.finished = state.end(now);
            }
            if position.y < FALL_LIMIT_Y && state.restart() {
                self.reset(Some(body), state);
                report.fell = true;
            }
        }

        report
    }

    /// Upward impulse if the marble is roughly grounded
    pub fn jump<B: RigidBodyOps>(&self, body: &mut B) -> bool {
        if body.linear_velocity().y.abs() >= GROUND_VELOCITY_THRESHOLD {
            return false;
        }
        body.apply_impulse(Vec3::new(0.0, JUMP_IMPULSE, 0.0), true);
        true
    }

    /// World-space impulse for the held directions
    pub fn movement_impulse(&self, input: &TickInput, delta: f32) -> Vec3 {
        let mut direction = Vec3::ZERO;
        if input.forward {
            direction.z -= 1.0;
        }
        if input.backward {
            direction.z += 1.0;
        }
        if input.left {
            direction.x -= 1.0;
        }
        if input.right {
            direction.x += 1.0;
        }

        if self.normalize_movement {
            direction = direction.normalize_or_zero();
        }
        direction * MOVE_IMPULSE_PER_SEC * delta
    }

    /// Put the marble back on the start block and clear the run
    pub fn reset<B: RigidBodyOps>(&mut self, body: Option<&mut B>, state: &mut GameState) {
        if let Some(body) = body {
            body.set_translation(PLAYER_SPAWN, true);
            body.apply_impulse(Vec3::ZERO, true);
            body.set_linear_velocity(Vec3::ZERO, true);
        }
        self.camera.snap();
        state.reset();
        log::debug!("Player reset to spawn");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::mock::MockWorld;
    use crate::physics::{BodyDesc, BodyKind, PhysicsWorld, Shape};

    fn world_with_player() -> (MockWorld, usize) {
        let mut world = MockWorld::default();
        let handle = world.spawn(
            &BodyDesc::new(BodyKind::Dynamic, Shape::Ball { radius: PLAYER_RADIUS })
                .with_translation(PLAYER_SPAWN),
        );
        (world, handle)
    }

    fn playing_state(block_count: u32) -> GameState {
        let mut state = GameState::new(block_count, 0);
        state.start(0.0);
        state
    }

    #[test]
    fn test_first_input_starts_run() {
        let (mut world, h) = world_with_player();
        let mut state = GameState::new(4, 0);
        let mut player = PlayerController::default();

        let report = player.frame(world.body_mut(h), &mut state, &TickInput::default(), SIM_DT, 10.0);
        assert!(!report.started);
        assert_eq!(state.phase(), GamePhase::Ready);

        let input = TickInput {
            forward: true,
            any_pressed: true,
            ..Default::default()
        };
        let report = player.frame(world.body_mut(h), &mut state, &input, SIM_DT, 20.0);
        assert!(report.started);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.start_time(), 20.0);
    }

    #[test]
    fn test_jump_gated_on_vertical_velocity() {
        let (mut world, h) = world_with_player();
        let player = PlayerController::default();

        let body = world.body_mut(h).unwrap();
        assert!(player.jump(body));
        assert_eq!(body.impulses, vec![Vec3::new(0.0, 6.0, 0.0)]);

        // Now moving upward: airborne
        assert!(!player.jump(body));
        assert_eq!(body.impulses.len(), 1);

        body.velocity = Vec3::new(3.0, 0.05, 0.0);
        assert!(player.jump(body));
    }

    #[test]
    fn test_diagonal_impulse_not_normalized_by_default() {
        let input = TickInput {
            forward: true,
            right: true,
            ..Default::default()
        };
        let impulse = PlayerController::default().movement_impulse(&input, 0.1);
        assert!((impulse - Vec3::new(1.0, 0.0, -1.0)).length() < 1e-6);

        let normalized = PlayerController::new(true).movement_impulse(&input, 0.1);
        assert!((normalized.length() - 1.0).abs() < 1e-6);
        assert!(normalized.x > 0.0 && normalized.z < 0.0);
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(PlayerController::new(true).movement_impulse(&input, 0.5), Vec3::ZERO);
        assert_eq!(PlayerController::default().movement_impulse(&input, 0.5), Vec3::ZERO);
    }

    #[test]
    fn test_finish_line_boundary() {
        let (mut world, h) = world_with_player();
        let mut state = playing_state(4);
        let mut player = PlayerController::default();
        let idle = TickInput::default();

        world.body_mut(h).unwrap().translation = Vec3::new(0.0, 0.85, -26.0);
        let report = player.frame(world.body_mut(h), &mut state, &idle, SIM_DT, 5000.0);
        assert!(!report.finished);
        assert_eq!(state.phase(), GamePhase::Playing);

        world.body_mut(h).unwrap().translation = Vec3::new(0.0, 0.85, -26.01);
        let report = player.frame(world.body_mut(h), &mut state, &idle, SIM_DT, 6000.0);
        assert!(report.finished);
        assert_eq!(state.phase(), GamePhase::Ended);
        assert_eq!(state.elapsed_ms(), Some(6000.0));
    }

    #[test]
    fn test_fall_restarts_and_resets_body() {
        let (mut world, h) = world_with_player();
        let mut state = playing_state(4);
        let mut player = PlayerController::default();

        {
            let body = world.body_mut(h).unwrap();
            body.translation = Vec3::new(1.0, -4.5, -10.0);
            body.velocity = Vec3::new(0.0, -8.0, -2.0);
        }
        let report = player.frame(world.body_mut(h), &mut state, &TickInput::default(), SIM_DT, 100.0);

        assert!(report.fell);
        assert_eq!(state.phase(), GamePhase::Ready);
        assert_eq!(state.start_time(), 0.0);
        let body = world.body(h).unwrap();
        assert_eq!(body.translation, PLAYER_SPAWN);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(player.camera, CameraRig::default());
    }

    #[test]
    fn test_fall_ignored_outside_playing() {
        let (mut world, h) = world_with_player();
        let mut state = GameState::new(4, 0);
        let mut player = PlayerController::default();

        world.body_mut(h).unwrap().translation = Vec3::new(0.0, -10.0, 0.0);
        let report = player.frame(world.body_mut(h), &mut state, &TickInput::default(), SIM_DT, 0.0);
        assert!(!report.fell);
        assert_eq!(world.body(h).unwrap().translation.y, -10.0);
    }

    #[test]
    fn test_reset_signal_consumed_once() {
        let (mut world, h) = world_with_player();
        let mut state = playing_state(4);
        state.end(900.0);
        let mut player = PlayerController::default();

        world.body_mut(h).unwrap().translation = Vec3::new(0.0, 0.85, -30.0);
        state.request_reset();

        let report = player.frame(world.body_mut(h), &mut state, &TickInput::default(), SIM_DT, 1000.0);
        assert!(report.reset);
        assert!(!state.reset_requested());
        assert_eq!(state.phase(), GamePhase::Ready);
        assert_eq!(world.body(h).unwrap().translation, PLAYER_SPAWN);

        let report = player.frame(world.body_mut(h), &mut state, &TickInput::default(), SIM_DT, 1016.0);
        assert!(!report.reset);
    }

    #[test]
    fn test_missing_body_is_noop() {
        let mut state = GameState::new(4, 0);
        let mut player = PlayerController::default();
        state.request_reset();

        let input = TickInput {
            jump: true,
            forward: true,
            any_pressed: true,
            ..Default::default()
        };
        let report = player.frame::<crate::physics::mock::MockBody>(None, &mut state, &input, SIM_DT, 50.0);

        assert!(report.reset);
        assert!(report.started);
        assert!(!report.jumped);
        assert_eq!(player.camera, CameraRig::default());
    }

    #[test]
    fn test_camera_smoothing_is_frame_rate_independent() {
        let body = Vec3::new(0.0, 0.85, -10.0);

        let mut one = CameraRig::default();
        one.follow(body, 0.1);

        let mut two = CameraRig::default();
        two.follow(body, 0.05);
        two.follow(body, 0.05);

        assert!((one.position - two.position).length() < 1e-4);
        assert!((one.target - two.target).length() < 1e-4);

        // Converges on the offset view
        let mut rig = CameraRig::default();
        for _ in 0..600 {
            rig.follow(body, SIM_DT);
        }
        assert!((rig.position - (body + CAMERA_OFFSET)).length() < 1e-3);
        assert!((rig.target - (body + CAMERA_TARGET_OFFSET)).length() < 1e-3);
    }
}
