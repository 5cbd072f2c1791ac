//! Monte Carlo simulation configuration.
//!
//! This module provides the configuration type and builder for Monte Carlo
//! pricing runs.

use pricer_core::validate;
use pricer_core::{PricingError, Result};

/// How trials are scheduled.
///
/// Both modes return bit-identical results for the same seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Execution {
    /// Run every trial on the calling thread.
    Sequential,
    /// Spread trial blocks over the rayon thread pool.
    #[default]
    Parallel,
}

/// Monte Carlo simulation configuration.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .n_steps(252)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloConfig {
    n_paths: usize,
    n_steps: usize,
    seed: Option<u64>,
    execution: Execution,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Number of simulated trials M.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps N per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Master seed, `None` for a fresh random seed per run.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Trial scheduling mode.
    #[inline]
    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if either count is zero.
    pub fn validate(&self) -> Result<()> {
        validate::at_least(self.n_paths, 1, "paths")?;
        validate::at_least(self.n_steps, 1, "steps")?;
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    seed: Option<u64>,
    execution: Execution,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulation paths.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path.
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the master seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional master seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the trial scheduling mode.
    #[inline]
    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if a count is missing or zero.
    pub fn build(self) -> Result<MonteCarloConfig> {
        let n_paths = self
            .n_paths
            .ok_or_else(|| PricingError::invalid_parameter("paths", "must be set"))?;
        let n_steps = self
            .n_steps
            .ok_or_else(|| PricingError::invalid_parameter("steps", "must be set"))?;

        let config = MonteCarloConfig {
            n_paths,
            n_steps,
            seed: self.seed,
            execution: self.execution,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MonteCarloConfig::builder()
            .n_paths(100)
            .n_steps(10)
            .build()
            .unwrap();
        assert_eq!(config.seed(), None);
        assert_eq!(config.execution(), Execution::Parallel);
    }

    #[test]
    fn test_builder_missing_counts() {
        let err = MonteCarloConfig::builder().n_steps(10).build().unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter { name: "paths", .. }));

        let err = MonteCarloConfig::builder().n_paths(10).build().unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter { name: "steps", .. }));
    }

    #[test]
    fn test_builder_rejects_zero_counts() {
        assert!(MonteCarloConfig::builder().n_paths(0).n_steps(10).build().is_err());
        assert!(MonteCarloConfig::builder().n_paths(10).n_steps(0).build().is_err());
    }

    #[test]
    fn test_maybe_seed() {
        let config = MonteCarloConfig::builder()
            .n_paths(1)
            .n_steps(1)
            .seed(3)
            .maybe_seed(None)
            .execution(Execution::Sequential)
            .build()
            .unwrap();
        assert_eq!(config.seed(), None);
        assert_eq!(config.execution(), Execution::Sequential);
    }
}
