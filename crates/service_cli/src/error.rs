//! CLI error type

use pricer_core::PricingError;
use pricer_models::payoff::PayoffError;
use thiserror::Error;

/// Errors surfaced by CLI commands; `main` prints them and exits non-zero.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("payoff: {0}")]
    Payoff(#[from] PayoffError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
