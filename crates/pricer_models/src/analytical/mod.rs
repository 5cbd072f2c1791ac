//! Analytical pricing formulas for European options.
//!
//! This module provides closed-form solutions used to validate the numerical
//! engines:
//! - Black-Scholes-Merton model with continuous dividend yield
//! - Standard normal distribution and error functions
//!
//! ## Design Principles
//!
//! - **Numerical Stability**: Uses an erfc-based CDF
//! - **Validated inputs**: Constructors fail with
//!   [`PricingError`](pricer_core::PricingError) instead of producing NaN

pub mod black_scholes;
pub mod distributions;

// Re-export main types at module level
pub use black_scholes::BlackScholes;
pub use distributions::{erf, erfc, norm_cdf, norm_pdf};
