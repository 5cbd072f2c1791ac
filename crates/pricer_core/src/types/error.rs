//! Error types for structured error handling.
//!
//! Every engine in the workspace fails through [`PricingError`]. Errors are
//! raised synchronously at the point of detection and are never retried: they
//! describe caller mistakes, not transient conditions.

use thiserror::Error;

/// Convenience type alias for results produced by the pricing engines.
pub type Result<T> = std::result::Result<T, PricingError>;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidParameter`: A single input violates its domain constraint
/// - `InvalidModel`: A derived model quantity is inconsistent for otherwise valid inputs
/// - `PayoffCompile`: A payoff expression is not a single well-formed expression
/// - `PayoffEval`: A payoff expression failed while being evaluated on a path
///
/// # Examples
/// ```
/// use pricer_core::PricingError;
///
/// let err = PricingError::invalid_parameter("spot", "must be positive, got -1");
/// assert_eq!(err.to_string(), "invalid spot: must be positive, got -1");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// A single field violates its domain constraint (non-positive price or
    /// time, sub-unity step count, non-finite input).
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of the violated constraint.
        reason: String,
    },

    /// A derived quantity, such as the risk-neutral probability, is
    /// mathematically inconsistent given otherwise valid inputs.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The payoff expression could not be compiled.
    #[error("payoff compile error: {0}")]
    PayoffCompile(String),

    /// The payoff expression failed during evaluation.
    #[error("payoff evaluation error: {0}")]
    PayoffEval(String),
}

impl PricingError {
    /// Creates an [`PricingError::InvalidParameter`] for the named field.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        PricingError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` when the error was caused by a malformed or failing payoff.
    pub fn is_payoff_error(&self) -> bool {
        matches!(
            self,
            PricingError::PayoffCompile(_) | PricingError::PayoffEval(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = PricingError::invalid_parameter("maturity", "must be positive, got 0");
        assert_eq!(err.to_string(), "invalid maturity: must be positive, got 0");
    }

    #[test]
    fn test_invalid_model_display() {
        let err = PricingError::InvalidModel("risk-neutral probability 1.5 outside [0, 1]".into());
        assert!(err.to_string().starts_with("invalid model:"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_payoff_errors_are_flagged() {
        assert!(PricingError::PayoffCompile("unexpected ')'".into()).is_payoff_error());
        assert!(PricingError::PayoffEval("name 'os' is not defined".into()).is_payoff_error());
        assert!(!PricingError::InvalidModel("p".into()).is_payoff_error());
    }

    #[test]
    fn test_invalid_parameter_fields_accessible() {
        match PricingError::invalid_parameter("steps", "must be at least 1") {
            PricingError::InvalidParameter { name, reason } => {
                assert_eq!(name, "steps");
                assert_eq!(reason, "must be at least 1");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<PricingError>();
    }
}
