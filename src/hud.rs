//! Read-only view of the game for the UI overlay

use serde::{Deserialize, Serialize};

use crate::input::Controls;
use crate::sim::{GamePhase, GameState};

/// Everything the overlay needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub start_time: f64,
    pub end_time: f64,
    /// Final time in seconds once ended, "0.00" otherwise
    pub time_text: String,
    /// The restart button is only offered after finishing
    pub show_restart: bool,
    pub controls: Controls,
}

impl Hud {
    pub fn from_state(state: &GameState, controls: Controls) -> Self {
        let time_text = match state.elapsed_ms() {
            Some(ms) => format!("{:.2}", ms / 1000.0),
            None => "0.00".to_string(),
        };

        Self {
            phase: state.phase(),
            start_time: state.start_time(),
            end_time: state.end_time(),
            time_text,
            show_restart: state.phase() == GamePhase::Ended,
            controls,
        }
    }
}
