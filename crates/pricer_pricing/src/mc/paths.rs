//! Geometric Brownian Motion path generation.
//!
//! Prices are advanced in log space with the exact GBM transition:
//!
//! ```text
//! S(t+Δt) = S(t) · exp((r - q - σ²/2)Δt + σ√Δt · Z),   Z ~ N(0, 1)
//! ```
//!
//! A path holds N+1 prices; index 0 is the spot price.

use pricer_core::validate;
use pricer_core::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rng::PricerRng;

/// Parameters for Geometric Brownian Motion path generation.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::GbmParams;
///
/// let params = GbmParams {
///     spot: 100.0,
///     rate: 0.05,
///     volatility: 0.2,
///     dividend_yield: 0.0,
///     maturity: 1.0,
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GbmParams {
    /// Initial spot price (S₀).
    pub spot: f64,
    /// Risk-free rate (r) - annualised.
    pub rate: f64,
    /// Volatility (σ) - annualised.
    pub volatility: f64,
    /// Continuous dividend yield (q).
    pub dividend_yield: f64,
    /// Time to maturity (T) - in years.
    pub maturity: f64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            rate: 0.05,
            volatility: 0.2,
            dividend_yield: 0.0,
            maturity: 1.0,
        }
    }
}

impl GbmParams {
    /// Checks the parameter domain.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate::positive(self.spot, "spot")?;
        validate::finite(self.rate, "rate")?;
        validate::non_negative(self.volatility, "volatility")?;
        validate::finite(self.dividend_yield, "dividend_yield")?;
        validate::positive(self.maturity, "maturity")?;
        Ok(())
    }

    /// Present value factor e^(-rT) applied to the averaged payoff.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Per-step log drift and diffusion for `n_steps` steps.
    #[inline]
    pub fn step_coefficients(&self, n_steps: usize) -> StepCoefficients {
        let dt = self.maturity / n_steps as f64;
        StepCoefficients {
            drift: (self.rate - self.dividend_yield - 0.5 * self.volatility * self.volatility) * dt,
            diffusion: self.volatility * dt.sqrt(),
        }
    }
}

/// Log-space increments of one time step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepCoefficients {
    /// (r - q - σ²/2)Δt
    pub drift: f64,
    /// σ√Δt
    pub diffusion: f64,
}

/// Simulates one path into `path`, replacing its contents.
///
/// The buffer is reused across trials so no allocation happens once it has
/// grown to N+1 elements.
pub fn simulate_path(
    spot: f64,
    coefficients: StepCoefficients,
    n_steps: usize,
    rng: &mut PricerRng,
    path: &mut Vec<f64>,
) {
    path.clear();
    path.push(spot);
    let mut current = spot;
    for _ in 0..n_steps {
        let z = rng.gen_normal();
        current *= (coefficients.drift + coefficients.diffusion * z).exp();
        path.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::PricingError;

    #[test]
    fn test_validate_rejects_out_of_domain() {
        let cases = [
            GbmParams { spot: -1.0, ..GbmParams::default() },
            GbmParams { volatility: -0.1, ..GbmParams::default() },
            GbmParams { maturity: 0.0, ..GbmParams::default() },
            GbmParams { rate: f64::INFINITY, ..GbmParams::default() },
        ];
        for params in cases {
            assert!(matches!(params.validate(), Err(PricingError::InvalidParameter { .. })));
        }
        assert!(GbmParams { volatility: 0.0, ..GbmParams::default() }.validate().is_ok());
    }

    #[test]
    fn test_step_coefficients() {
        let params = GbmParams {
            dividend_yield: 0.01,
            ..GbmParams::default()
        };
        let c = params.step_coefficients(4);
        assert_relative_eq!(c.drift, (0.05 - 0.01 - 0.02) * 0.25, epsilon = 1e-15);
        assert_relative_eq!(c.diffusion, 0.2 * 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_simulate_path_shape_and_reuse() {
        let params = GbmParams::default();
        let coefficients = params.step_coefficients(10);
        let mut rng = PricerRng::from_seed(5);
        let mut path = vec![1.0; 50];

        simulate_path(params.spot, coefficients, 10, &mut rng, &mut path);

        assert_eq!(path.len(), 11);
        assert_eq!(path[0], 100.0);
        assert!(path.iter().all(|&s| s > 0.0));
    }

    #[test]
    fn test_zero_volatility_path_is_deterministic_forward() {
        let params = GbmParams {
            volatility: 0.0,
            dividend_yield: 0.01,
            ..GbmParams::default()
        };
        let n_steps = 12;
        let dt = params.maturity / n_steps as f64;
        let coefficients = params.step_coefficients(n_steps);
        let mut path = Vec::new();

        for seed in [0, 11, 42, u64::MAX] {
            let mut rng = PricerRng::from_seed(seed);
            simulate_path(params.spot, coefficients, n_steps, &mut rng, &mut path);

            assert_eq!(path.len(), n_steps + 1);
            for (k, &price) in path.iter().enumerate() {
                let forward = params.spot * ((params.rate - params.dividend_yield) * k as f64 * dt).exp();
                assert_relative_eq!(price, forward, max_relative = 1e-12);
            }
        }
    }
}
