//! Browser entry point
//!
//! The page owns rendering and DOM events; it forwards key codes here, calls
//! `frame` from `requestAnimationFrame`, and reads poses and HUD state back.

use wasm_bindgen::prelude::*;

use crate::hud::Hud;
use crate::input::KeyboardState;
use crate::physics::{PhysicsWorld, RapierWorld, RigidBodyOps};
use crate::settings::Settings;
use crate::sim::{FixedTimestep, Game, TickInput};

/// Longest frame we simulate; tab switches otherwise produce huge deltas
const MAX_FRAME_DT: f32 = 0.1;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Marble Race starting...");
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<RapierWorld>,
    keys: KeyboardState,
    timestep: FixedTimestep,
    /// Input carried over frames that produced no tick
    pending: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// Build a game from the settings in LocalStorage
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        Self::with_settings(&Settings::load())
    }

    /// Build a game with an explicit seed and block count
    pub fn with_seed(seed: u64, count: u32) -> WebGame {
        let settings = Settings::load().with_seed(seed).with_count(count);
        Self::with_settings(&settings)
    }

    /// Returns true when the key is bound (caller may preventDefault)
    pub fn key_down(&mut self, code: &str) -> bool {
        self.keys.set_key(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.keys.set_key(code, false)
    }

    /// Window lost focus
    pub fn blur(&mut self) {
        self.keys.release_all();
    }

    /// Advance by the wall-clock delta in seconds; returns ticks run
    pub fn frame(&mut self, dt: f32) -> u32 {
        let sampled = self.keys.sample();
        self.pending = TickInput {
            jump: self.pending.jump || sampled.jump,
            any_pressed: self.pending.any_pressed || sampled.any_pressed,
            ..sampled
        };

        let steps = self.game.advance(
            &mut self.timestep,
            dt.clamp(0.0, MAX_FRAME_DT),
            &self.pending,
            now_ms(),
        );
        if steps > 0 {
            self.pending = self.pending.held_only();
        }
        steps
    }

    /// Restart button: regenerate the course and put the marble back
    pub fn request_reset(&mut self) {
        self.game.state.request_reset();
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.game.state.phase()).to_lowercase()
    }

    pub fn time_text(&self) -> String {
        self.hud().time_text
    }

    pub fn show_restart(&self) -> bool {
        self.hud().show_restart
    }

    /// Full overlay state as JSON
    pub fn hud_json(&self) -> String {
        serde_json::to_string(&self.hud()).unwrap_or_default()
    }

    /// Placed blocks as JSON, for building meshes
    pub fn layout_json(&self) -> String {
        serde_json::to_string(&self.game.level().layout).unwrap_or_default()
    }

    /// `[x, y, z, qx, qy, qz, qw]`; empty without a body
    pub fn player_transform(&self) -> Vec<f32> {
        self.game
            .player_body()
            .map(transform_of)
            .unwrap_or_default()
    }

    /// `[px, py, pz, tx, ty, tz]`
    pub fn camera(&self) -> Vec<f32> {
        let rig = &self.game.player.camera;
        vec![
            rig.position.x,
            rig.position.y,
            rig.position.z,
            rig.target.x,
            rig.target.y,
            rig.target.z,
        ]
    }

    /// Seven floats per obstacle in block order, see `player_transform`
    pub fn obstacle_transforms(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.game.level().obstacles.len() * 7);
        for obstacle in &self.game.level().obstacles {
            let body = obstacle.body.and_then(|h| self.game.world.body(h));
            match body {
                Some(body) => out.extend(transform_of(body)),
                None => {
                    let pose = obstacle.rest_pose();
                    out.extend(pose.translation.to_array());
                    out.extend(pose.rotation.to_array());
                }
            }
        }
        out
    }
}

impl WebGame {
    fn with_settings(settings: &Settings) -> WebGame {
        let game = Game::new(RapierWorld::default(), settings);
        log::info!(
            "Level ready: {} blocks, seed {}",
            game.state.block_count(),
            game.state.blocks_seed()
        );
        WebGame {
            game,
            keys: KeyboardState::new(),
            timestep: FixedTimestep::default(),
            pending: TickInput::default(),
        }
    }

    fn hud(&self) -> Hud {
        Hud::from_state(&self.game.state, self.keys.controls())
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}

fn transform_of<B: RigidBodyOps>(body: &B) -> Vec<f32> {
    let mut out = Vec::with_capacity(7);
    out.extend(body.translation().to_array());
    out.extend(body.rotation().to_array());
    out
}
