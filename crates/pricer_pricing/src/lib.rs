//! # Pricer Engines (Layer 3)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing hosts the two numerical engines:
//! - [`lattice`]: Cox-Ross-Rubinstein binomial tree for European and American
//!   vanilla options
//! - [`mc`]: Geometric Brownian Motion Monte Carlo for arbitrary path payoffs
//!   supplied through [`PathPayoff`](pricer_core::PathPayoff)
//! - [`rng`]: seeded random streams with per-trial sub-seeding
//!
//! Both engines are synchronous, allocation-light and free of side effects;
//! they validate their inputs and fail fast with
//! [`PricingError`](pricer_core::PricingError).
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::lattice::{price_lattice, LatticeParams};
//! use pricer_pricing::mc::{price_monte_carlo, GbmParams};
//!
//! let tree = price_lattice(&LatticeParams::default()).unwrap();
//!
//! let call = |path: &[f64]| (path[path.len() - 1] - 105.0).max(0.0);
//! let mc = price_monte_carlo(&GbmParams::default(), 1, 100_000, &call, Some(42)).unwrap();
//!
//! assert!((tree - mc).abs() < 0.25);
//! ```

pub mod lattice;
pub mod mc;
pub mod rng;

pub use lattice::{price_lattice, LatticeParams};
pub use mc::{price_monte_carlo, GbmParams, MonteCarloConfig, MonteCarloPricer, PricingResult};
