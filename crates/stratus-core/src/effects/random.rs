//! Randomness effect interface.
//!
//! Synchronous so that backoff delay computation stays a plain function of
//! the attempt index, the configuration and one draw.

/// Source of uniform random values.
pub trait RandomEffects: Send + Sync {
    /// A uniformly distributed `u64`.
    fn random_u64(&self) -> u64;

    /// A uniformly distributed `f64` in `[0, 1)`.
    ///
    /// Uses the top 53 bits of [`RandomEffects::random_u64`], which is the
    /// full precision of an `f64` mantissa.
    fn random_unit(&self) -> f64 {
        (self.random_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl<T: RandomEffects + ?Sized> RandomEffects for std::sync::Arc<T> {
    fn random_u64(&self) -> u64 {
        (**self).random_u64()
    }

    fn random_unit(&self) -> f64 {
        (**self).random_unit()
    }
}
