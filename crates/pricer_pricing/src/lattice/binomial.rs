//! Cox-Ross-Rubinstein binomial lattice.
//!
//! ## Mathematical Formulas
//!
//! - Δt = T / N
//! - u = e^(σ√Δt), d = 1/u
//! - p = (e^((r-q)Δt) - d) / (u - d)
//! - V(i, n) = e^(-rΔt) · (p·V(i+1, n+1) + (1-p)·V(i, n+1))
//!
//! American exercise replaces each node value with the larger of its
//! continuation value and its intrinsic value.
//!
//! Only the current frontier of N+1 values is stored; it shrinks by one node
//! per step of backward induction.

use pricer_core::validate;
use pricer_core::{ExerciseStyle, OptionType, PricingError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inputs of a lattice valuation.
///
/// # Examples
///
/// ```rust
/// use pricer_core::{ExerciseStyle, OptionType};
/// use pricer_pricing::lattice::{price_lattice, LatticeParams};
///
/// let params = LatticeParams {
///     option_type: OptionType::Put,
///     exercise: ExerciseStyle::American,
///     ..LatticeParams::default()
/// };
/// let american_put = price_lattice(&params).unwrap();
/// assert!(american_put > 5.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatticeParams {
    /// Current underlying price S₀ (> 0).
    pub spot: f64,
    /// Strike price K (> 0).
    pub strike: f64,
    /// Continuously compounded risk-free rate r.
    pub rate: f64,
    /// Annualised volatility σ (≥ 0).
    pub volatility: f64,
    /// Time to maturity T in years (> 0).
    pub maturity: f64,
    /// Number of time steps N (≥ 1).
    pub steps: usize,
    /// Call or put.
    pub option_type: OptionType,
    /// European or American exercise.
    pub exercise: ExerciseStyle,
    /// Continuous dividend yield q.
    pub dividend_yield: f64,
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 105.0,
            rate: 0.05,
            volatility: 0.2,
            maturity: 1.0,
            steps: 100,
            option_type: OptionType::Call,
            exercise: ExerciseStyle::European,
            dividend_yield: 0.0,
        }
    }
}

impl LatticeParams {
    /// Checks the parameter domain.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate::positive(self.spot, "spot")?;
        validate::positive(self.strike, "strike")?;
        validate::positive(self.maturity, "maturity")?;
        validate::at_least(self.steps, 1, "steps")?;
        validate::finite(self.rate, "rate")?;
        validate::non_negative(self.volatility, "volatility")?;
        validate::finite(self.dividend_yield, "dividend_yield")?;
        Ok(())
    }
}

/// Per-step CRR quantities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrrFactors {
    /// Step length Δt.
    pub dt: f64,
    /// Up factor u.
    pub up: f64,
    /// Down factor d = 1/u.
    pub down: f64,
    /// Risk-neutral probability of an up move.
    pub probability: f64,
    /// One-step discount factor e^(-rΔt).
    pub discount: f64,
}

impl CrrFactors {
    /// Computes the CRR factors.
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` if Δt underflows to zero
    /// - `PricingError::InvalidModel` if the up and down moves coincide or
    ///   the risk-neutral probability falls outside [0, 1]
    pub fn new(
        volatility: f64,
        rate: f64,
        dividend_yield: f64,
        maturity: f64,
        steps: usize,
    ) -> Result<Self> {
        let dt = maturity / steps as f64;
        if dt == 0.0 {
            return Err(PricingError::invalid_parameter(
                "steps",
                format!("time step size became zero ({maturity} / {steps})"),
            ));
        }

        let up = (volatility * dt.sqrt()).exp();
        let down = 1.0 / up;
        if up == down {
            return Err(PricingError::InvalidModel(format!(
                "up and down moves coincide for volatility {volatility}; \
                 risk-neutral probability is undefined"
            )));
        }

        let growth = ((rate - dividend_yield) * dt).exp();
        let probability = (growth - down) / (up - down);
        if !(0.0..=1.0).contains(&probability) {
            return Err(PricingError::InvalidModel(format!(
                "risk-neutral probability {probability} is outside [0, 1]; adjust inputs"
            )));
        }

        Ok(Self {
            dt,
            up,
            down,
            probability,
            discount: (-rate * dt).exp(),
        })
    }

    /// Underlying price at node `i` (number of up moves) of step `step`.
    #[inline]
    pub fn node_price(&self, spot: f64, step: usize, i: usize) -> f64 {
        spot * self.up.powf(i as f64) * self.down.powf((step - i) as f64)
    }
}

/// Prices a vanilla option on the CRR lattice.
///
/// # Errors
/// - `PricingError::InvalidParameter` for inputs outside their domain
/// - `PricingError::InvalidModel` when no-arbitrage fails (p ∉ [0, 1])
pub fn price_lattice(params: &LatticeParams) -> Result<f64> {
    params.validate()?;

    let factors = CrrFactors::new(
        params.volatility,
        params.rate,
        params.dividend_yield,
        params.maturity,
        params.steps,
    )?;
    let n = params.steps;
    let p = factors.probability;
    let early_exercise = params.exercise.allows_early_exercise();
    let intrinsic = |step: usize, i: usize| {
        params
            .option_type
            .intrinsic(factors.node_price(params.spot, step, i), params.strike)
    };

    let mut values: Vec<f64> = (0..=n).map(|i| intrinsic(n, i)).collect();

    for step in (0..n).rev() {
        for i in 0..=step {
            let continuation = factors.discount * (p * values[i + 1] + (1.0 - p) * values[i]);
            values[i] = if early_exercise {
                continuation.max(intrinsic(step, i))
            } else {
                continuation
            };
        }
        values.truncate(step + 1);
    }

    Ok(values[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_european_call() {
        let price = price_lattice(&LatticeParams::default()).unwrap();
        assert_relative_eq!(price, 8.02, epsilon = 0.1);
    }

    #[test]
    fn test_single_step_by_hand() {
        let params = LatticeParams {
            steps: 1,
            strike: 100.0,
            ..LatticeParams::default()
        };
        let f = CrrFactors::new(0.2, 0.05, 0.0, 1.0, 1).unwrap();
        let expected = f.discount * f.probability * (100.0 * f.up - 100.0);
        assert_relative_eq!(price_lattice(&params).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_factors() {
        let f = CrrFactors::new(0.2, 0.05, 0.0, 1.0, 100).unwrap();
        assert_relative_eq!(f.dt, 0.01);
        assert_relative_eq!(f.up * f.down, 1.0, epsilon = 1e-15);
        assert_relative_eq!(f.up, (0.02_f64).exp());
        assert!(f.probability > 0.0 && f.probability < 1.0);
    }

    #[test]
    fn test_deep_itm_american_put_exercises_immediately() {
        let params = LatticeParams {
            spot: 1.0,
            strike: 100.0,
            option_type: OptionType::Put,
            exercise: ExerciseStyle::American,
            ..LatticeParams::default()
        };
        assert_relative_eq!(price_lattice(&params).unwrap(), 99.0, epsilon = 1e-9);
    }

    #[test]
    fn test_american_call_without_dividends_matches_european() {
        let european = price_lattice(&LatticeParams::default()).unwrap();
        let american = price_lattice(&LatticeParams {
            exercise: ExerciseStyle::American,
            ..LatticeParams::default()
        })
        .unwrap();
        assert_relative_eq!(american, european, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_parameters() {
        let cases = [
            LatticeParams { spot: -1.0, ..LatticeParams::default() },
            LatticeParams { strike: 0.0, ..LatticeParams::default() },
            LatticeParams { maturity: 0.0, ..LatticeParams::default() },
            LatticeParams { steps: 0, ..LatticeParams::default() },
            LatticeParams { volatility: -0.2, ..LatticeParams::default() },
            LatticeParams { rate: f64::NAN, ..LatticeParams::default() },
        ];
        for params in cases {
            assert!(
                matches!(price_lattice(&params), Err(PricingError::InvalidParameter { .. })),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_underflowing_time_step() {
        let params = LatticeParams {
            maturity: f64::MIN_POSITIVE,
            steps: usize::MAX,
            ..LatticeParams::default()
        };
        assert!(matches!(
            price_lattice(&params),
            Err(PricingError::InvalidParameter { name: "steps", .. })
        ));
    }

    #[test]
    fn test_zero_volatility_is_invalid_model() {
        let params = LatticeParams {
            volatility: 0.0,
            ..LatticeParams::default()
        };
        assert!(matches!(price_lattice(&params), Err(PricingError::InvalidModel(_))));
    }

    #[test]
    fn test_probability_above_one_is_invalid_model() {
        // Tiny volatility with a large rate pushes growth beyond the up move
        let params = LatticeParams {
            rate: 0.5,
            volatility: 0.01,
            steps: 10,
            ..LatticeParams::default()
        };
        let err = price_lattice(&params).unwrap_err();
        assert!(matches!(err, PricingError::InvalidModel(ref m) if m.contains("outside [0, 1]")));
    }
}
