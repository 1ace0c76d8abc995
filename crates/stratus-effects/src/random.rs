//! Random effect handler
//!
//! Note: This module legitimately uses `rand::thread_rng()` as it implements
//! the `RandomEffects` trait - this is the handler layer where actual system
//! randomness is provided.

use rand::Rng;
use stratus_core::RandomEffects;

/// Real random handler backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RealRandomHandler;

impl RealRandomHandler {
    /// Create a new real random handler
    pub fn new() -> Self {
        Self
    }
}

impl RandomEffects for RealRandomHandler {
    fn random_u64(&self) -> u64 {
        rand::thread_rng().gen()
    }

    fn random_unit(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_draws_stay_in_range() {
        let handler = RealRandomHandler::new();
        for _ in 0..1000 {
            let draw = handler.random_unit();
            assert!((0.0..1.0).contains(&draw));
        }
    }

    #[test]
    fn test_draws_vary() {
        let handler = RealRandomHandler::new();
        let first = handler.random_u64();
        assert!((0..16).any(|_| handler.random_u64() != first));
    }
}
