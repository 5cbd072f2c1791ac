//! Input validation helpers.
//!
//! Standardises validation across engines using `!is_finite()` to reject
//! NaN, +Inf and -Inf uniformly. Every helper reports the offending field
//! through [`PricingError::InvalidParameter`].

use crate::types::error::{PricingError, Result};

/// Validate that a value is strictly positive and finite.
pub fn positive(value: f64, name: &'static str) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricingError::invalid_parameter(
            name,
            format!("must be positive and finite, got {value}"),
        ));
    }
    Ok(value)
}

/// Validate that a value is non-negative and finite.
pub fn non_negative(value: f64, name: &'static str) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(PricingError::invalid_parameter(
            name,
            format!("must be non-negative and finite, got {value}"),
        ));
    }
    Ok(value)
}

/// Validate that a value is finite (allows zero and negatives).
pub fn finite(value: f64, name: &'static str) -> Result<f64> {
    if !value.is_finite() {
        return Err(PricingError::invalid_parameter(
            name,
            format!("must be finite, got {value}"),
        ));
    }
    Ok(value)
}

/// Validate that a count is at least `minimum`.
pub fn at_least(count: usize, minimum: usize, name: &'static str) -> Result<usize> {
    if count < minimum {
        return Err(PricingError::invalid_parameter(
            name,
            format!("must be at least {minimum}, got {count}"),
        ));
    }
    Ok(count)
}
