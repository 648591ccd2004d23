//! Keyboard action state
//!
//! The platform layer feeds key changes in; the game samples one `TickInput`
//! per tick. Edges (jump, any press) are latched until sampled so a press and
//! release between two ticks is not lost.

use serde::{Deserialize, Serialize};

use crate::observer::{SubscriptionId, Subscribers};
use crate::sim::TickInput;

/// Named input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Jump,
    ];

    /// Map a DOM `KeyboardEvent.code` to an action
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Action::Forward),
            "KeyS" | "ArrowDown" => Some(Action::Backward),
            "KeyA" | "ArrowLeft" => Some(Action::Left),
            "KeyD" | "ArrowRight" => Some(Action::Right),
            "Space" => Some(Action::Jump),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A single action change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChange {
    pub action: Action,
    pub pressed: bool,
}

/// Held-key snapshot, also used for HUD key indicators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Default)]
pub struct KeyboardState {
    held: [bool; 5],
    jump_edge: bool,
    press_edge: bool,
    observers: Subscribers<KeyChange>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action change; repeats of the current state are ignored
    pub fn set(&mut self, action: Action, pressed: bool) {
        let slot = &mut self.held[action.index()];
        if *slot == pressed {
            return;
        }
        *slot = pressed;

        if pressed {
            self.press_edge = true;
            if action == Action::Jump {
                self.jump_edge = true;
            }
        }
        self.observers.notify(&KeyChange { action, pressed });
    }

    /// Record a DOM key code; returns false for unmapped keys
    pub fn set_key(&mut self, code: &str, pressed: bool) -> bool {
        match Action::from_key_code(code) {
            Some(action) => {
                self.set(action, pressed);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    pub fn controls(&self) -> Controls {
        Controls {
            forward: self.is_held(Action::Forward),
            backward: self.is_held(Action::Backward),
            left: self.is_held(Action::Left),
            right: self.is_held(Action::Right),
            jump: self.is_held(Action::Jump),
        }
    }

    /// Input for the next tick; clears latched edges
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            forward: self.is_held(Action::Forward),
            backward: self.is_held(Action::Backward),
            left: self.is_held(Action::Left),
            right: self.is_held(Action::Right),
            jump: self.jump_edge,
            any_pressed: self.press_edge,
        };
        self.jump_edge = false;
        self.press_edge = false;
        input
    }

    /// Release everything (e.g. on focus loss)
    pub fn release_all(&mut self) {
        for action in Action::ALL {
            self.set(action, false);
        }
    }

    /// Observe action changes
    pub fn subscribe(&mut self, callback: impl FnMut(&KeyChange) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Stop observing; safe to call more than once
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}
