//! Random number source for the simulation
//!
//! Owned by the driver and handed down by `&mut` so that a fixed seed replays
//! an identical sequence of launches and explosions.

use crate::math::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Seedable uniform random source
pub struct RandomSource {
    rng: SmallRng,
}

impl RandomSource {
    /// Create a deterministic source from a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Uniform float in [min, max)
    ///
    /// Returns `min` when the range is empty or not finite.
    #[inline]
    pub fn next_float(&mut self, min: f32, max: f32) -> f32 {
        if min >= max || !(max - min).is_finite() {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform integer in [min, max], inclusive on both ends
    ///
    /// Returns `min` when `min >= max`.
    #[inline]
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Uniform direction on the unit circle
    #[inline]
    pub fn next_unit_vector(&mut self) -> Vec2 {
        let angle = self.next_float(0.0, TAU);
        Vec2::new(angle.cos(), angle.sin())
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
