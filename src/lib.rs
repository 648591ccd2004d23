//! Marble Race - procedural obstacle course for a physics-driven marble
//!
//! Core modules:
//! - `sim`: Deterministic level generation and gameplay loop
//! - `physics`: Rigid-body engine boundary (Rapier adapter behind `physics`)
//! - `input`: Keyboard action state and edge sampling
//! - `hud`: Read-only view of the game state for the UI layer
//! - `settings`: Level and controller configuration

pub mod hud;
pub mod input;
pub mod observer;
pub mod physics;
pub mod settings;
pub mod sim;

#[cfg(all(target_arch = "wasm32", feature = "physics"))]
pub mod web;

pub use hud::Hud;
pub use input::{Action, KeyboardState};
pub use settings::{LevelConfig, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz, matches the browser frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World gravity
    pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    /// Fallback block footprint for kinds missing from the catalog
    pub const DEFAULT_BLOCK_DEPTH: f32 = 5.5;
    pub const DEFAULT_BLOCK_WIDTH: f32 = 5.5;
    /// Floor slab thickness under every block
    pub const FLOOR_THICKNESS: f32 = 0.2;

    /// Side walls and finish wall
    pub const WALL_HEIGHT: f32 = 4.0;
    pub const WALL_THICKNESS: f32 = 0.3;

    /// Player marble
    pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 0.85, 0.0);
    pub const PLAYER_RADIUS: f32 = 0.68; // icosahedron r=0.8 scaled by 0.85
    pub const PLAYER_RESTITUTION: f32 = 0.2;
    pub const PLAYER_FRICTION: f32 = 1.0;

    /// Impulse per second of held direction
    pub const MOVE_IMPULSE_PER_SEC: f32 = 10.0;
    pub const JUMP_IMPULSE: f32 = 6.0;
    /// |vel.y| below this counts as grounded
    pub const GROUND_VELOCITY_THRESHOLD: f32 = 0.1;
    /// Falling below this height restarts the run
    pub const FALL_LIMIT_Y: f32 = -4.0;

    /// Camera rig
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 5.5);
    pub const CAMERA_TARGET_OFFSET: Vec3 = Vec3::new(0.0, 0.65, 0.0);
    pub const CAMERA_POSITION_SMOOTHING: f32 = 3.0;
    pub const CAMERA_TARGET_SMOOTHING: f32 = 5.0;
}

/// Frame-rate independent lerp factor for exponential smoothing
#[inline]
pub fn smoothing_alpha(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Z coordinate the marble must pass to finish a course of `block_count` blocks
///
/// Assumes a fixed 6 units per block and ignores catalog depths. On courses
/// of short blocks the finish wall (End z - 2.5) lies in front of this line:
/// four Limbo blocks put the wall at z = -24 and the line at z = -26.
#[inline]
pub fn finish_line_z(block_count: u32) -> f32 {
    -(block_count as f32 * 6.0 + 2.0)
}
