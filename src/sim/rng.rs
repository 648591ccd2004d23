//! Seeded random stream for level generation
//!
//! One stream is created per level build. Block choices are drawn first, then
//! one phase offset per oscillating obstacle, so the whole level is a pure
//! function of the seed.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::blocks::BlockKind;

/// Reproducible uniform stream backed by PCG32
#[derive(Debug, Clone)]
pub struct RandomSequence {
    seed: u64,
    rng: Pcg32,
}

impl RandomSequence {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Use the given seed, or fall back to a clock-derived one
    pub fn from_seed_or_time(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => {
                let seed = time_seed();
                log::info!("No level seed configured, using time-based seed {seed}");
                Self::new(seed)
            }
        }
    }

    /// The seed this stream was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1)
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Draw `count` independent picks from `candidates`
    pub fn generate(&mut self, count: u32, candidates: &[BlockKind]) -> Vec<BlockKind> {
        if candidates.is_empty() {
            log::warn!("Course generation called with no candidate kinds");
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let idx = (self.uniform() * candidates.len() as f64).floor() as usize;
                candidates[idx.min(candidates.len() - 1)].clone()
            })
            .collect()
    }

    /// Phase offset in [0, 2π) for one oscillating obstacle
    pub fn phase_offset(&mut self) -> f32 {
        (self.rng.random::<f32>() * TAU).rem_euclid(TAU)
    }

    /// Default course length: 4 to 7 obstacle blocks
    pub fn block_count(&mut self) -> u32 {
        4 + (self.uniform() * 4.0).floor() as u32
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn time_seed() -> u64 {
    js_sys::Date::now() as u64
}
