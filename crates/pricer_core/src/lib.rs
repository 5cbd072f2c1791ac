//! # pricer_core: Foundation Types for the Option Pricers
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace and provides:
//! - Error types: [`PricingError`] and the [`Result`] alias (`types::error`)
//! - Contract enums: [`OptionType`], [`ExerciseStyle`] (`types::option`)
//! - The payoff capability consumed by Monte Carlo engines: [`PathPayoff`] (`traits`)
//! - Input validation helpers shared by every engine (`validate`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - thiserror: Error derivation
//! - serde: Serialisation of contract enums
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::{ExerciseStyle, OptionType, PathPayoff};
//!
//! let option_type: OptionType = "put".parse().unwrap();
//! assert_eq!(option_type.intrinsic(90.0, 100.0), 10.0);
//! assert_eq!("american".parse::<ExerciseStyle>().unwrap(), ExerciseStyle::American);
//!
//! // Any closure over a price path is a payoff.
//! let terminal_call = |path: &[f64]| (path[path.len() - 1] - 100.0).max(0.0);
//! assert_eq!(terminal_call.evaluate(&[100.0, 104.0]).unwrap(), 4.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod traits;
pub mod types;
pub mod validate;

pub use traits::PathPayoff;
pub use types::{ExerciseStyle, OptionType, PricingError, Result};
