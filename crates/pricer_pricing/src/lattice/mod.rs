//! # Binomial Lattice Pricing
//!
//! Cox-Ross-Rubinstein recombining tree for European and American vanilla
//! options.
//!
//! ## Module Structure
//!
//! - [`binomial`]: lattice parameters, CRR factors and backward induction
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::lattice::{price_lattice, LatticeParams};
//!
//! let price = price_lattice(&LatticeParams::default()).unwrap();
//! assert!((price - 8.02).abs() < 0.1);
//! ```

pub mod binomial;

pub use binomial::{price_lattice, CrrFactors, LatticeParams};
