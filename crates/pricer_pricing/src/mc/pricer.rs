//! Monte Carlo pricer for path-dependent payoffs under GBM.
//!
//! Trials are grouped into fixed blocks of [`BLOCK_SIZE`]. Each block owns
//! one path buffer, seeds every trial from the master seed and the trial
//! index, and accumulates its payoffs sequentially. Block statistics are
//! merged in block order, so the estimate depends only on the seed and never
//! on the number of worker threads.

use pricer_core::{PathPayoff, PricingError, Result};
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::{Execution, MonteCarloConfig};
use super::paths::{simulate_path, GbmParams, StepCoefficients};
use crate::rng::{random_seed, PricerRng};

/// Trials per block.
pub const BLOCK_SIZE: usize = 256;

/// Monte Carlo pricing result.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PricingResult {
    /// Present value estimate.
    pub price: f64,
    /// Standard error of the price estimate (discounted).
    pub std_error: f64,
    /// Number of simulated trials.
    pub n_paths: usize,
    /// Master seed that reproduces this run.
    pub seed: u64,
}

impl PricingResult {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }
}

/// Running statistics of one block (count, sum, Welford mean and M2).
#[derive(Clone, Copy, Debug, Default)]
struct BlockStats {
    count: usize,
    sum: f64,
    mean: f64,
    m2: f64,
}

impl BlockStats {
    #[inline]
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Chan et al. pairwise combination.
    fn merge(self, other: BlockStats) -> BlockStats {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let weight = other.count as f64 / count as f64;
        BlockStats {
            count,
            sum: self.sum + other.sum,
            mean: self.mean + delta * weight,
            m2: self.m2 + other.m2 + delta * delta * self.count as f64 * weight,
        }
    }
}

/// Monte Carlo pricer.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{GbmParams, MonteCarloConfig, MonteCarloPricer};
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(20_000)
///     .n_steps(12)
///     .seed(42)
///     .build()
///     .unwrap();
/// let pricer = MonteCarloPricer::new(config).unwrap();
///
/// let call = |path: &[f64]| (path[path.len() - 1] - 100.0).max(0.0);
/// let result = pricer.price(&GbmParams::default(), &call).unwrap();
///
/// assert!((result.price - 10.45).abs() < 4.0 * result.std_error + 0.05);
/// assert_eq!(result.seed, 42);
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloPricer {
    config: MonteCarloConfig,
}

impl MonteCarloPricer {
    /// Creates a pricer from a validated configuration.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if the configuration is invalid.
    pub fn new(config: MonteCarloConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Prices `payoff` under `gbm`.
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` for model inputs outside their domain
    /// - the payoff's own error, or `PricingError::PayoffEval` if it returns
    ///   a non-finite amount; the run stops at the first failure
    pub fn price<P>(&self, gbm: &GbmParams, payoff: &P) -> Result<PricingResult>
    where
        P: PathPayoff + ?Sized,
    {
        gbm.validate()?;

        let n_paths = self.config.n_paths();
        let n_steps = self.config.n_steps();
        let seed = self.config.seed().unwrap_or_else(random_seed);
        let coefficients = gbm.step_coefficients(n_steps);
        let n_blocks = n_paths.div_ceil(BLOCK_SIZE);

        let run_block = |block: usize| {
            let start = block * BLOCK_SIZE;
            let end = (start + BLOCK_SIZE).min(n_paths);
            simulate_block(gbm.spot, coefficients, n_steps, seed, start..end, payoff)
        };

        let blocks: Vec<BlockStats> = match self.config.execution() {
            Execution::Sequential => (0..n_blocks).map(run_block).collect::<Result<_>>()?,
            Execution::Parallel => (0..n_blocks)
                .into_par_iter()
                .map(run_block)
                .collect::<Result<_>>()?,
        };

        let stats = blocks
            .into_iter()
            .fold(BlockStats::default(), BlockStats::merge);

        let discount = gbm.discount_factor();
        let price = discount * (stats.sum / n_paths as f64);
        let std_error = if n_paths > 1 {
            let variance = stats.m2 / (n_paths - 1) as f64;
            discount * (variance / n_paths as f64).sqrt()
        } else {
            0.0
        };

        Ok(PricingResult {
            price,
            std_error,
            n_paths,
            seed,
        })
    }
}

fn simulate_block<P>(
    spot: f64,
    coefficients: StepCoefficients,
    n_steps: usize,
    seed: u64,
    trials: std::ops::Range<usize>,
    payoff: &P,
) -> Result<BlockStats>
where
    P: PathPayoff + ?Sized,
{
    let mut path = Vec::with_capacity(n_steps + 1);
    let mut stats = BlockStats::default();

    for trial in trials {
        let mut rng = PricerRng::for_trial(seed, trial as u64);
        simulate_path(spot, coefficients, n_steps, &mut rng, &mut path);

        let value = payoff.evaluate(&path)?;
        if !value.is_finite() {
            return Err(PricingError::PayoffEval(format!(
                "payoff returned non-finite value {value} on path {trial}"
            )));
        }
        stats.push(value);
    }

    Ok(stats)
}

/// Prices `payoff` with `n_paths` trials of `n_steps` steps and returns the
/// present value only.
///
/// `seed = None` draws a fresh master seed, so the run is not reproducible.
///
/// # Errors
/// Same as [`MonteCarloPricer::price`], plus `PricingError::InvalidParameter`
/// if either count is zero.
pub fn price_monte_carlo<P>(
    gbm: &GbmParams,
    n_steps: usize,
    n_paths: usize,
    payoff: &P,
    seed: Option<u64>,
) -> Result<f64>
where
    P: PathPayoff + ?Sized,
{
    let config = MonteCarloConfig::builder()
        .n_paths(n_paths)
        .n_steps(n_steps)
        .maybe_seed(seed)
        .build()?;
    MonteCarloPricer::new(config)?
        .price(gbm, payoff)
        .map(|result| result.price)
}
