//! Core contract types.
//!
//! This module provides:
//! - `error`: The structured error type shared by every pricing engine
//! - `option`: Option type and exercise style of a contract
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`PricingError`], [`Result`] from `error`
//! - [`OptionType`], [`ExerciseStyle`] from `option`

pub mod error;
pub mod option;

// Re-export commonly used types at module level
pub use error::{PricingError, Result};
pub use option::{ExerciseStyle, OptionType};
