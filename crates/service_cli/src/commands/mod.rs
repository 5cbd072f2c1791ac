//! CLI command implementations
//!
//! Each submodule implements one subcommand: it computes an outcome, then
//! prints it.

pub mod demo;
pub mod lattice;
pub mod monte_carlo;
