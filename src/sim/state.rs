//! Game phase state machine
//!
//! Ready -> Playing -> Ended, with restart (Playing -> Ready) and an
//! externally raised reset signal that returns any phase to Ready.
//! Transitions are the only way to change phase and timers; calls that do
//! not apply in the current phase are ignored and return `false`.

use serde::{Deserialize, Serialize};

use crate::observer::{SubscriptionId, Subscribers};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first movement input
    #[default]
    Ready,
    /// Timer running
    Playing,
    /// Finish line crossed
    Ended,
}

/// Phase, run timers, and level identity
#[derive(Debug)]
pub struct GameState {
    phase: GamePhase,
    /// Monotonic timestamps in milliseconds
    start_time: f64,
    end_time: f64,
    /// One-shot reset request raised by the UI
    reset_trigger: bool,
    /// Obstacle blocks in the current level
    block_count: u32,
    /// Seed of the current level layout
    blocks_seed: u64,
    phase_observers: Subscribers<GamePhase>,
}

impl GameState {
    pub fn new(block_count: u32, blocks_seed: u64) -> Self {
        Self {
            phase: GamePhase::Ready,
            start_time: 0.0,
            end_time: 0.0,
            reset_trigger: false,
            block_count,
            blocks_seed,
            phase_observers: Subscribers::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    pub fn blocks_seed(&self) -> u64 {
        self.blocks_seed
    }

    /// Run time in milliseconds, available once the run has ended
    pub fn elapsed_ms(&self) -> Option<f64> {
        (self.phase == GamePhase::Ended).then(|| (self.end_time - self.start_time).max(0.0))
    }

    /// Ready -> Playing
    pub fn start(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        self.start_time = now;
        log::info!("Run started at {now:.1}ms");
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Playing -> Ended
    pub fn end(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.end_time = now;
        log::info!(
            "Run ended at {now:.1}ms ({:.2}s)",
            (self.end_time - self.start_time) / 1000.0
        );
        self.set_phase(GamePhase::Ended);
        true
    }

    /// Playing -> Ready after falling off the course
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        log::info!("Fell off the course, restarting");
        self.set_phase(GamePhase::Ready);
        true
    }

    /// Any phase -> Ready with cleared timers (physical reset)
    pub fn reset(&mut self) {
        self.start_time = 0.0;
        self.end_time = 0.0;
        self.set_phase(GamePhase::Ready);
    }

    /// Raise the reset signal (the UI's only write)
    pub fn request_reset(&mut self) {
        self.reset_trigger = true;
    }

    /// Whether a reset is waiting to be consumed
    pub fn reset_requested(&self) -> bool {
        self.reset_trigger
    }

    /// Consume the reset signal; true exactly once per request
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_trigger)
    }

    /// Switch to the next level layout seed
    pub(crate) fn advance_seed(&mut self) -> u64 {
        self.blocks_seed = self.blocks_seed.wrapping_add(1);
        self.blocks_seed
    }

    /// Observe phase changes
    pub fn subscribe_phase(&mut self, callback: impl FnMut(&GamePhase) + 'static) -> SubscriptionId {
        self.phase_observers.subscribe(callback)
    }

    /// Stop observing; safe to call more than once
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.phase_observers.unsubscribe(id)
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::debug!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_observers.notify(&phase);
    }
}
