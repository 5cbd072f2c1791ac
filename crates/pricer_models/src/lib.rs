//! # pricer_models: Payoff Language and Reference Models
//!
//! ## Layer 2 Role
//!
//! pricer_models sits between the foundation types and the numerical engines:
//! - [`payoff`]: a sandboxed expression language turning formulas such as
//!   `max(s - strike, 0)` into [`PathPayoff`](pricer_core::PathPayoff)
//!   implementations the Monte Carlo engine can evaluate
//! - [`analytical`]: closed-form Black-Scholes prices used as a reference for
//!   the lattice and Monte Carlo engines
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::PathPayoff;
//! use pricer_models::payoff::compile_payoff;
//!
//! let payoff = compile_payoff("max(s - strike, 0)", [("strike", 100.0)]).unwrap();
//! assert_eq!(payoff.evaluate(&[100.0, 97.0, 112.5]).unwrap(), 12.5);
//! ```

pub mod analytical;
pub mod payoff;
