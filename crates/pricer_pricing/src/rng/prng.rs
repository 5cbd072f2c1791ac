//! Pseudo-random number generator wrapper for Monte Carlo simulations.
//!
//! This module provides [`PricerRng`], a seeded PRNG wrapper, and the
//! SplitMix64 mixer used to derive independent per-trial seeds.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Weyl increment of the SplitMix64 sequence (2^64 / golden ratio).
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finaliser.
///
/// A bijective mixing function on `u64`; nearby inputs map to unrelated
/// outputs.
#[inline]
pub fn splitmix64(value: u64) -> u64 {
    let mut z = value;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of trial `trial` in the run identified by `master_seed`.
///
/// This is element `trial + 1` of the SplitMix64 sequence started at
/// `master_seed`.
#[inline]
pub fn trial_seed(master_seed: u64, trial: u64) -> u64 {
    splitmix64(master_seed.wrapping_add(trial.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)))
}

/// Draws a fresh master seed from the thread-local entropy source.
pub fn random_seed() -> u64 {
    rand::random()
}

/// Monte Carlo simulation random number generator.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::PricerRng;
///
/// let mut rng = PricerRng::for_trial(42, 0);
/// assert!(rng.gen_normal().is_finite());
/// ```
pub struct PricerRng {
    inner: StdRng,
}

impl PricerRng {
    /// Creates a new RNG instance initialised with the given seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::rng::PricerRng;
    ///
    /// let mut rng1 = PricerRng::from_seed(12345);
    /// let mut rng2 = PricerRng::from_seed(12345);
    /// assert_eq!(rng1.gen_normal(), rng2.gen_normal());
    /// ```
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the stream of one Monte Carlo trial.
    #[inline]
    pub fn for_trial(master_seed: u64, trial: u64) -> Self {
        Self::from_seed(trial_seed(master_seed, trial))
    }

    /// Generates a single standard normal variate (mean=0, std=1).
    ///
    /// Uses the Ziggurat algorithm via `rand_distr::StandardNormal`.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PricerRng::from_seed(99);
        let mut b = PricerRng::from_seed(99);
        for _ in 0..100 {
            assert_eq!(a.gen_normal(), b.gen_normal());
        }
    }

    #[test]
    fn test_trial_streams_differ() {
        let mut first = PricerRng::for_trial(42, 0);
        let mut second = PricerRng::for_trial(42, 1);
        assert_ne!(first.gen_normal(), second.gen_normal());
        assert_ne!(trial_seed(42, 0), trial_seed(43, 0));
    }

    #[test]
    fn test_splitmix64_reference_value() {
        // First output of the reference SplitMix64 generator seeded with 0
        assert_eq!(splitmix64(GOLDEN_GAMMA), 0xE220_A839_7B1D_CDAF);
        assert_eq!(trial_seed(0, 0), 0xE220_A839_7B1D_CDAF);
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = PricerRng::from_seed(7);
        let buffer: Vec<f64> = (0..50_000).map(|_| rng.gen_normal()).collect();

        let n = buffer.len() as f64;
        let mean = buffer.iter().sum::<f64>() / n;
        let variance = buffer.iter().map(|z| (z - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert!(mean.abs() < 0.03, "mean {mean}");
        assert!((variance - 1.0).abs() < 0.05, "variance {variance}");
    }
}
