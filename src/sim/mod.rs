//! Deterministic gameplay module
//!
//! Level generation and the per-tick gameplay loop live here:
//! - Seeded RNG only; a level is a pure function of (count, seed, kinds)
//! - Fixed per-tick order: obstacles, controller, physics step
//! - No rendering or platform dependencies

pub mod blocks;
pub mod layout;
pub mod level;
pub mod obstacle;
pub mod player;
pub mod rng;
pub mod state;
pub mod tick;

pub use blocks::{BlockCatalog, BlockKind, BlockSpec};
pub use layout::{CourseBounds, Layout, PlacedBlock, StaticCollider, Surface};
pub use level::Level;
pub use obstacle::{Obstacle, ObstacleKind, Pose};
pub use player::{CameraRig, FrameReport, PlayerController};
pub use rng::RandomSequence;
pub use state::{GamePhase, GameState};
pub use tick::{FixedTimestep, Game, TickInput, player_body_desc};
