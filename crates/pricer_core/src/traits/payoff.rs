//! Path payoff capability.
//!
//! A payoff is a pure mapping from a simulated price path to a scalar cash
//! amount paid at maturity. Monte Carlo engines receive it from the caller
//! and know nothing else about it, so a vanilla call, an Asian average or a
//! compiled user expression all look the same to the engine.

use crate::types::error::Result;

/// Trait for payoffs evaluated on a complete price path.
///
/// `path[0]` is the spot price and `path[path.len() - 1]` the terminal price.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` and must not carry hidden state
/// between invocations: engines evaluate the same payoff concurrently from
/// several worker threads.
///
/// # Closures
///
/// Every `Fn(&[f64]) -> f64` closure is a payoff that never fails:
///
/// ```
/// use pricer_core::PathPayoff;
///
/// let asian_call = |path: &[f64]| {
///     let average = path.iter().sum::<f64>() / path.len() as f64;
///     (average - 100.0).max(0.0)
/// };
/// assert_eq!(asian_call.evaluate(&[100.0, 110.0, 120.0]).unwrap(), 10.0);
/// ```
pub trait PathPayoff: Send + Sync {
    /// Computes the undiscounted payoff of a single path.
    ///
    /// # Errors
    /// Returns [`PricingError::PayoffEval`](crate::PricingError::PayoffEval)
    /// when the payoff cannot be evaluated on this path.
    fn evaluate(&self, path: &[f64]) -> Result<f64>;
}

impl<F> PathPayoff for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    #[inline]
    fn evaluate(&self, path: &[f64]) -> Result<f64> {
        Ok(self(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PricingError;

    struct FailingPayoff;

    impl PathPayoff for FailingPayoff {
        fn evaluate(&self, _path: &[f64]) -> Result<f64> {
            Err(PricingError::PayoffEval("always fails".into()))
        }
    }

    fn evaluate_dyn(payoff: &dyn PathPayoff, path: &[f64]) -> Result<f64> {
        payoff.evaluate(path)
    }

    #[test]
    fn test_closure_is_payoff() {
        let terminal_put = |path: &[f64]| (100.0 - path[path.len() - 1]).max(0.0);
        assert_eq!(terminal_put.evaluate(&[100.0, 92.5]).unwrap(), 7.5);
    }

    #[test]
    fn test_trait_object_dispatch() {
        let lookback = |path: &[f64]| path.iter().cloned().fold(f64::MIN, f64::max) - path[0];
        assert_eq!(evaluate_dyn(&lookback, &[100.0, 130.0, 90.0]).unwrap(), 30.0);
        assert!(evaluate_dyn(&FailingPayoff, &[100.0]).is_err());
    }
}
