//! # Monte Carlo Pricing Engine
//!
//! GBM path simulation and payoff averaging with reproducible, thread-count
//! independent results.
//!
//! ## Module Structure
//!
//! - [`config`]: run configuration and builder
//! - [`paths`]: GBM parameters and path simulation
//! - [`pricer`]: block-parallel estimator and the `price_monte_carlo` entry point
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::mc::{price_monte_carlo, GbmParams};
//!
//! let put = |path: &[f64]| (100.0 - path[path.len() - 1]).max(0.0);
//! let price = price_monte_carlo(&GbmParams::default(), 50, 10_000, &put, Some(7)).unwrap();
//! assert!(price > 3.0 && price < 8.0);
//! ```

pub mod config;
pub mod paths;
pub mod pricer;

pub use config::{Execution, MonteCarloConfig, MonteCarloConfigBuilder};
pub use paths::{simulate_path, GbmParams, StepCoefficients};
pub use pricer::{price_monte_carlo, MonteCarloPricer, PricingResult, BLOCK_SIZE};
