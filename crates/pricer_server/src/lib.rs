//! REST API server for the option pricers
//!
//! This crate exposes the binomial lattice and Monte Carlo engines over HTTP,
//! together with a small HTML form for interactive use.

pub mod config;
pub mod routes;
pub mod server;

// Re-export pricer dependencies for integration
pub use pricer_core;
pub use pricer_models;
pub use pricer_pricing;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
