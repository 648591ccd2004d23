//! Fixed timestep simulation tick
//!
//! Each tick runs in a fixed order: level clock, pending level regeneration,
//! obstacle targets, player controller, physics step.

use super::blocks::{BlockCatalog, BlockKind};
use super::level::Level;
use super::player::{FrameReport, PlayerController};
use super::rng::RandomSequence;
use super::state::GameState;
use crate::consts::*;
use crate::physics::{BodyDesc, BodyKind, PhysicsWorld, Shape};
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held directions
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Jump pressed since the previous tick
    pub jump: bool,
    /// Any action pressed since the previous tick
    pub any_pressed: bool,
}

impl TickInput {
    /// Whether this tick carries a fresh press; held keys alone never start a run
    pub fn wants_start(&self) -> bool {
        self.any_pressed || self.jump
    }

    /// Held directions only; edges dropped (for extra substeps in one frame)
    pub fn held_only(&self) -> Self {
        Self {
            jump: false,
            any_pressed: false,
            ..*self
        }
    }
}

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time; returns how many fixed ticks to run
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator = (self.accumulator + frame_dt.max(0.0)).min(self.dt * MAX_SUBSTEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

/// Player marble body description
pub fn player_body_desc() -> BodyDesc {
    BodyDesc::new(BodyKind::Dynamic, Shape::Ball { radius: PLAYER_RADIUS })
        .with_translation(PLAYER_SPAWN)
        .with_restitution(PLAYER_RESTITUTION)
        .with_friction(PLAYER_FRICTION)
}

/// A mounted level with its player, state, and physics world
pub struct Game<W: PhysicsWorld> {
    pub world: W,
    pub state: GameState,
    pub player: PlayerController,
    level: Level<W::Handle>,
    player_body: Option<W::Handle>,
    catalog: BlockCatalog,
    candidates: Vec<BlockKind>,
    /// Seconds since the level was mounted
    clock: f32,
}

impl<W: PhysicsWorld> Game<W> {
    /// Generate the first level and mount it in `world`
    pub fn new(mut world: W, settings: &Settings) -> Self {
        let mut rng = RandomSequence::from_seed_or_time(settings.level.seed);
        let seed = rng.seed();
        let count = settings.level.count.unwrap_or_else(|| rng.block_count());

        let candidates = if settings.level.candidate_kinds.is_empty() {
            log::warn!("No candidate block kinds configured, using the obstacle set");
            BlockKind::obstacles()
        } else {
            settings.level.candidate_kinds.clone()
        };
        let mut catalog = BlockCatalog::default();
        catalog.ensure(&candidates);

        let mut level = Level::build(count, &candidates, &catalog, seed);
        level.spawn(&mut world);
        let player_body = Some(world.spawn(&player_body_desc()));

        Self {
            world,
            state: GameState::new(count, seed),
            player: PlayerController::new(settings.normalize_movement),
            level,
            player_body,
            catalog,
            candidates,
            clock: 0.0,
        }
    }

    pub fn level(&self) -> &Level<W::Handle> {
        &self.level
    }

    pub fn player_handle(&self) -> Option<W::Handle> {
        self.player_body
    }

    pub fn player_body(&self) -> Option<&W::Body> {
        self.player_body.and_then(|h| self.world.body(h))
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Advance the simulation by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32, now: f64) -> FrameReport {
        self.clock += dt;

        if self.state.reset_requested() {
            self.regenerate();
        }

        self.level.animate(&mut self.world, self.clock);

        let body = match self.player_body {
            Some(handle) => self.world.body_mut(handle),
            None => None,
        };
        let report = self.player.frame(body, &mut self.state, input, dt, now);

        self.world.step(dt);
        report
    }

    /// Run as many fixed ticks as `frame_dt` covers; edges apply to the first
    pub fn advance(
        &mut self,
        timestep: &mut FixedTimestep,
        frame_dt: f32,
        input: &TickInput,
        now: f64,
    ) -> u32 {
        let steps = timestep.accumulate(frame_dt);
        for i in 0..steps {
            let tick_input = if i == 0 { *input } else { input.held_only() };
            self.tick(&tick_input, timestep.dt(), now);
        }
        steps
    }

    /// Replace the course with the next seed's layout, same block count
    fn regenerate(&mut self) {
        self.level.despawn(&mut self.world);
        let seed = self.state.advance_seed();
        self.level = Level::build(self.state.block_count(), &self.candidates, &self.catalog, seed);
        self.level.spawn(&mut self.world);
        log::info!("Regenerated level with seed {seed}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::mock::MockWorld;
    use crate::sim::state::GamePhase;
    use glam::Vec3;

    fn settings() -> Settings {
        Settings::default().with_seed(1).with_count(4)
    }

    fn forward() -> TickInput {
        TickInput {
            forward: true,
            any_pressed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_game_mounts_level_and_player() {
        let game = Game::new(MockWorld::default(), &settings());
        assert_eq!(game.state.phase(), GamePhase::Ready);
        assert_eq!(game.state.block_count(), 4);
        assert_eq!(game.state.blocks_seed(), 1);
        assert_eq!(game.level().sequence.len(), 4);
        assert_eq!(game.world.count_kind(BodyKind::Dynamic), 1);
        assert_eq!(game.player_body().unwrap().translation, PLAYER_SPAWN);
    }

    #[test]
    fn test_default_count_is_drawn_from_seed() {
        let settings = Settings::default().with_seed(77);
        let a = Game::new(MockWorld::default(), &settings);
        let b = Game::new(MockWorld::default(), &settings);
        assert!((4..8).contains(&a.state.block_count()));
        assert_eq!(a.state.block_count(), b.state.block_count());
        assert_eq!(a.level().sequence, b.level().sequence);
    }

    #[test]
    fn test_empty_candidates_fall_back_to_obstacles() {
        let mut settings = settings();
        settings.level.candidate_kinds.clear();
        let mut game = Game::new(MockWorld::default(), &settings);

        assert_eq!(game.level().sequence.len(), 4);
        assert!(game.level().sequence.iter().all(|k| BlockKind::obstacles().contains(k)));

        game.state.request_reset();
        game.tick(&TickInput::default(), SIM_DT, 0.0);
        assert_eq!(game.level().sequence.len(), 4);
    }

    #[test]
    fn test_movement_starts_run_and_moves_marble() {
        let mut game = Game::new(MockWorld::default(), &settings());

        game.tick(&forward(), SIM_DT, 0.0);
        assert_eq!(game.state.phase(), GamePhase::Playing);
        for i in 1..30 {
            game.tick(&forward().held_only(), SIM_DT, i as f64 * 16.0);
        }
        let body = game.player_body().unwrap();
        assert!(body.translation.z < PLAYER_SPAWN.z);
        assert_eq!(body.translation.x, 0.0);
        assert_eq!(game.world.steps, 30);
    }

    #[test]
    fn test_obstacles_follow_clock() {
        let mut game = Game::new(MockWorld::default(), &settings());
        game.tick(&TickInput::default(), 0.5, 0.0);

        for obstacle in &game.level().obstacles {
            let body = game.world.body(obstacle.body.unwrap()).unwrap();
            assert_eq!(body.translation, obstacle.pose(0.5).translation);
        }
    }

    #[test]
    fn test_reset_regenerates_level() {
        let mut game = Game::new(MockWorld::default(), &settings());
        let first_seed = game.level().seed;
        let live = game.world.live_count();

        game.tick(&forward(), SIM_DT, 0.0);
        game.state.request_reset();
        let report = game.tick(&TickInput::default(), SIM_DT, 16.0);

        assert!(report.reset);
        assert!(!game.state.reset_requested());
        assert_eq!(game.state.phase(), GamePhase::Ready);
        assert_eq!(game.level().seed, first_seed + 1);
        assert_eq!(game.state.blocks_seed(), first_seed + 1);
        assert_eq!(game.level().sequence.len(), 4);
        assert_eq!(game.world.live_count(), live);
    }

    #[test]
    fn test_fall_does_not_regenerate() {
        let mut game = Game::new(MockWorld::default(), &settings());
        game.tick(&forward(), SIM_DT, 0.0);

        let handle = game.player_handle().unwrap();
        game.world.body_mut(handle).unwrap().translation = Vec3::new(0.0, -5.0, -3.0);
        let report = game.tick(&TickInput::default(), SIM_DT, 16.0);

        assert!(report.fell);
        assert_eq!(game.state.phase(), GamePhase::Ready);
        assert_eq!(game.level().seed, 1);
    }

    #[test]
    fn test_held_key_after_fall_needs_new_press() {
        let mut game = Game::new(MockWorld::default(), &settings());
        game.tick(&forward(), SIM_DT, 0.0);

        let handle = game.player_handle().unwrap();
        game.world.body_mut(handle).unwrap().translation = Vec3::new(0.0, -5.0, -3.0);
        let report = game.tick(&forward().held_only(), SIM_DT, 16.0);
        assert!(report.fell);
        assert_eq!(game.state.phase(), GamePhase::Ready);

        let report = game.tick(&forward().held_only(), SIM_DT, 32.0);
        assert!(!report.started);
        assert_eq!(game.state.phase(), GamePhase::Ready);
        assert_eq!(game.state.start_time(), 0.0);

        let report = game.tick(&forward(), SIM_DT, 48.0);
        assert!(report.started);
        assert_eq!(game.state.start_time(), 48.0);
    }

    #[test]
    fn test_same_inputs_same_outcome() {
        let mut a = Game::new(MockWorld::default(), &settings());
        let mut b = Game::new(MockWorld::default(), &settings());
        let inputs = [
            forward(),
            TickInput { right: true, forward: true, ..Default::default() },
            TickInput { jump: true, any_pressed: true, ..Default::default() },
            TickInput::default(),
        ];
        for (i, input) in inputs.iter().enumerate() {
            a.tick(input, SIM_DT, i as f64);
            b.tick(input, SIM_DT, i as f64);
        }
        assert_eq!(
            a.player_body().unwrap().translation,
            b.player_body().unwrap().translation
        );
        assert_eq!(a.player.camera, b.player.camera);
    }

    #[test]
    fn test_advance_applies_edges_once() {
        let mut game = Game::new(MockWorld::default(), &settings());
        let mut timestep = FixedTimestep::default();
        let input = TickInput {
            jump: true,
            any_pressed: true,
            ..Default::default()
        };

        let steps = game.advance(&mut timestep, SIM_DT * 3.5, &input, 0.0);
        assert_eq!(steps, 3);
        let jumps = game
            .player_body()
            .unwrap()
            .impulses
            .iter()
            .filter(|i| i.y > 0.0)
            .count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_timestep_caps_substeps() {
        let mut ts = FixedTimestep::new(0.01);
        assert_eq!(ts.accumulate(1.0), MAX_SUBSTEPS);
        assert_eq!(ts.accumulate(0.004), 0);
        assert_eq!(ts.accumulate(0.007), 1);
    }
}
