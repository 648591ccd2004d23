//! Level and controller configuration
//!
//! Parsed from JSON. On the web, persisted in LocalStorage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::BlockKind;

/// Why a settings document was rejected
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("candidate block kinds must not be empty")]
    NoCandidateKinds,
}

/// Course generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Obstacle blocks between Start and End (random 4-7 when absent)
    pub count: Option<u32>,
    /// Kinds the generator picks from
    pub candidate_kinds: Vec<BlockKind>,
    /// Layout seed (time-based when absent)
    pub seed: Option<u64>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            count: None,
            candidate_kinds: BlockKind::obstacles(),
            seed: None,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: LevelConfig,
    /// Scale diagonal movement down to the axis-aligned impulse
    pub normalize_movement: bool,
}

impl Settings {
    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.level.candidate_kinds.is_empty() {
            return Err(SettingsError::NoCandidateKinds);
        }
        Ok(())
    }

    /// Same settings with a fixed layout seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.level.seed = Some(seed);
        self
    }

    /// Same settings with a fixed block count
    pub fn with_count(mut self, count: u32) -> Self {
        self.level.count = Some(count);
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "marble_race_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only); true when written
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> bool {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return false;
        };
        report_save(storage.set_item(Self::STORAGE_KEY, &self.to_json()))
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> bool {
        // Nothing to write to natively
        false
    }
}

/// Log the outcome of a storage write; true when it landed
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn report_save<E: std::fmt::Debug>(result: Result<(), E>) -> bool {
    match result {
        Ok(()) => {
            log::info!("Settings saved");
            true
        }
        Err(e) => {
            log::warn!("Failed to save settings: {e:?}");
            false
        }
    }
}
