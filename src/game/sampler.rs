//! Target selection.

use super::types::{MAX_NUMBER, MIN_NUMBER, Number, Target};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument};

/// Source of session targets.
pub trait TargetSampler: Send + Sync {
    /// Picks the target for a new session.
    fn sample(&self) -> Target;
}

/// Uniform target from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSampler;

impl TargetSampler for UniformSampler {
    #[instrument(skip(self))]
    fn sample(&self) -> Target {
        draw(&mut rand::rng())
    }
}

/// Uniform target from a seeded RNG, for reproducible games.
#[derive(Debug)]
pub struct SeededSampler {
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    /// Creates a sampler seeded with `seed`.
    #[instrument]
    pub fn new(seed: u64) -> Self {
        debug!("Creating seeded target sampler");
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TargetSampler for SeededSampler {
    #[instrument(skip(self))]
    fn sample(&self) -> Target {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&mut *rng)
    }
}

fn draw<R: Rng>(rng: &mut R) -> Target {
    let value = rng.random_range(MIN_NUMBER..=MAX_NUMBER);
    // random_range stays inside the inclusive bounds
    match Number::new(value) {
        Some(number) => Target::new(number),
        None => unreachable!("sampled {value} outside {MIN_NUMBER}..={MAX_NUMBER}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sampler_is_deterministic() {
        let a = SeededSampler::new(7);
        let b = SeededSampler::new(7);
        for _ in 0..20 {
            assert_eq!(a.sample().reveal(), b.sample().reveal());
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let sampler = SeededSampler::new(1234);
        for _ in 0..500 {
            let value = sampler.sample().reveal().value();
            assert!((MIN_NUMBER..=MAX_NUMBER).contains(&value));
        }
    }

    #[test]
    fn uniform_sampler_stays_in_range() {
        for _ in 0..100 {
            let value = UniformSampler.sample().reveal().value();
            assert!((1..=100).contains(&value));
        }
    }
}
