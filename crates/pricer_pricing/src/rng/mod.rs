//! # Random Number Generation
//!
//! Seeded pseudo-random streams for Monte Carlo simulation.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: a run is fully determined by one 64-bit master seed
//! - **Independence**: every trial draws from its own stream, derived from
//!   the master seed and the trial index with SplitMix64, so results do not
//!   depend on how trials are spread over threads
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut first = PricerRng::for_trial(42, 7);
//! let mut again = PricerRng::for_trial(42, 7);
//! assert_eq!(first.gen_normal(), again.gen_normal());
//! ```

pub mod prng;

pub use prng::{random_seed, splitmix64, trial_seed, PricerRng};
