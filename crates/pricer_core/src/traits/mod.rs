//! Core traits shared across pricing layers.
//!
//! - [`PathPayoff`]: the payoff capability a Monte Carlo engine evaluates on
//!   every simulated path

pub mod payoff;

pub use payoff::PathPayoff;
