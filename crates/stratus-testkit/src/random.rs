//! Deterministic randomness.

use parking_lot::Mutex;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use stratus_core::RandomEffects;

/// Replays a fixed cycle of unit draws.
///
/// `random_u64` returns the same draw scaled to the full `u64` range, so the
/// two methods stay consistent with each other.
#[derive(Debug)]
pub struct SequenceRandomHandler {
    draws: Vec<f64>,
    next: Mutex<usize>,
}

impl SequenceRandomHandler {
    /// Cycle through `draws`. Each must be in `[0, 1)`.
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "at least one draw is required");
        assert!(
            draws.iter().all(|d| (0.0..1.0).contains(d)),
            "draws must be in [0, 1)"
        );
        Self {
            draws,
            next: Mutex::new(0),
        }
    }

    /// Always return `draw`.
    pub fn constant(draw: f64) -> Self {
        Self::new(vec![draw])
    }

    /// The largest representable draw below one, which makes every backoff
    /// delay hit its jitter ceiling.
    pub fn maximal() -> Self {
        Self::constant(1.0 - f64::EPSILON)
    }

    /// Number of draws taken so far.
    pub fn draws_taken(&self) -> usize {
        *self.next.lock()
    }
}

impl RandomEffects for SequenceRandomHandler {
    fn random_u64(&self) -> u64 {
        ((self.random_unit() * (1u64 << 53) as f64) as u64) << 11
    }

    fn random_unit(&self) -> f64 {
        let mut next = self.next.lock();
        let draw = self.draws[*next % self.draws.len()];
        *next += 1;
        draw
    }
}

/// Seeded ChaCha20 stream for reproducible property tests.
#[derive(Debug)]
pub struct SeededRandomHandler {
    rng: Mutex<ChaCha20Rng>,
}

impl SeededRandomHandler {
    /// Stream determined entirely by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl RandomEffects for SeededRandomHandler {
    fn random_u64(&self) -> u64 {
        self.rng.lock().next_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_cycles() {
        let random = SequenceRandomHandler::new(vec![0.25, 0.75]);
        assert_eq!(random.random_unit(), 0.25);
        assert_eq!(random.random_unit(), 0.75);
        assert_eq!(random.random_unit(), 0.25);
        assert_eq!(random.draws_taken(), 3);
    }

    #[test]
    fn test_sequence_u64_matches_unit() {
        let random = SequenceRandomHandler::constant(0.5);
        assert_eq!(random.random_u64(), 1u64 << 63);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SeededRandomHandler::new(7);
        let b = SeededRandomHandler::new(7);
        let left: Vec<u64> = (0..8).map(|_| a.random_u64()).collect();
        let right: Vec<u64> = (0..8).map(|_| b.random_u64()).collect();
        assert_eq!(left, right);
        assert!((0..100).all(|_| (0.0..1.0).contains(&a.random_unit())));
    }
}
