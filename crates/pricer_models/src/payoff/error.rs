//! Payoff language errors with byte-span diagnostics.

use std::fmt;

use pricer_core::PricingError;
use thiserror::Error;

/// Byte range of a token within the source expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Errors produced while compiling or evaluating a payoff expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayoffError {
    /// The expression was rejected before any path was seen.
    #[error("{message} at {span}")]
    Compile {
        /// Human-readable reason.
        message: String,
        /// Offending source bytes.
        span: Span,
    },

    /// Evaluation against a concrete path failed.
    #[error("{0}")]
    Eval(String),
}

impl PayoffError {
    pub(crate) fn compile(message: impl Into<String>, span: Span) -> Self {
        Self::Compile {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn eval(message: impl Into<String>) -> Self {
        Self::Eval(message.into())
    }
}

impl From<PayoffError> for PricingError {
    fn from(err: PayoffError) -> Self {
        match err {
            PayoffError::Compile { .. } => PricingError::PayoffCompile(err.to_string()),
            PayoffError::Eval(message) => PricingError::PayoffEval(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_display_includes_span() {
        let err = PayoffError::compile("unexpected character '$'", Span::new(4, 5));
        assert_eq!(err.to_string(), "unexpected character '$' at 4..5");
    }

    #[test]
    fn test_conversion_into_pricing_error() {
        let compile: PricingError = PayoffError::compile("bad", Span::new(0, 1)).into();
        assert!(matches!(compile, PricingError::PayoffCompile(ref m) if m == "bad at 0..1"));

        let eval: PricingError = PayoffError::eval("division by zero").into();
        assert_eq!(eval, PricingError::PayoffEval("division by zero".to_string()));
        assert!(eval.is_payoff_error());
    }

    #[test]
    fn test_span_join() {
        assert_eq!(Span::new(3, 5).join(Span::new(1, 4)), Span::new(1, 5));
    }
}
