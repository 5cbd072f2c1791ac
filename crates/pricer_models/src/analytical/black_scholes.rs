//! Black-Scholes-Merton pricing for European options.
//!
//! Reference prices for the lattice and Monte Carlo engines.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use pricer_core::validate;
use pricer_core::{OptionType, PricingError, Result};

use super::distributions::norm_cdf;

/// Black-Scholes-Merton model with a continuous dividend yield.
///
/// # Examples
/// ```
/// use pricer_core::OptionType;
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2, 0.0).unwrap();
/// let call = bs.price(OptionType::Call, 100.0, 1.0).unwrap();
/// let put = bs.price(OptionType::Put, 100.0, 1.0).unwrap();
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    /// Spot price (S)
    spot: f64,
    /// Risk-free interest rate (r)
    rate: f64,
    /// Volatility (σ)
    volatility: f64,
    /// Continuous dividend yield (q)
    dividend_yield: f64,
}

impl BlackScholes {
    /// Creates a new Black-Scholes-Merton model.
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` if spot or volatility is not
    ///   strictly positive, or if rate or dividend yield is not finite
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(-100.0, 0.05, 0.2, 0.0).is_err());
    /// assert!(BlackScholes::new(100.0, 0.05, 0.0, 0.0).is_err());
    /// ```
    pub fn new(spot: f64, rate: f64, volatility: f64, dividend_yield: f64) -> Result<Self> {
        validate::positive(spot, "spot")?;
        validate::finite(rate, "rate")?;
        validate::positive(volatility, "volatility")?;
        validate::finite(dividend_yield, "dividend_yield")?;

        Ok(Self {
            spot,
            rate,
            volatility,
            dividend_yield,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the continuous dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Computes the d1 term.
    ///
    /// d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
    #[inline]
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let log_moneyness = (self.spot / strike).ln();
        let drift =
            (self.rate - self.dividend_yield + 0.5 * self.volatility * self.volatility) * expiry;

        (log_moneyness + drift) / vol_sqrt_t
    }

    /// Computes the d2 term, d₁ - σ√T.
    #[inline]
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Prices a European option.
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` if strike or expiry is not
    ///   strictly positive
    pub fn price(&self, option_type: OptionType, strike: f64, expiry: f64) -> Result<f64> {
        validate::positive(strike, "strike")?;
        validate::positive(expiry, "maturity")?;

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let forward_spot = self.spot * (-self.dividend_yield * expiry).exp();
        let discounted_strike = strike * (-self.rate * expiry).exp();

        let price = match option_type {
            OptionType::Call => forward_spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
            OptionType::Put => discounted_strike * norm_cdf(-d2) - forward_spot * norm_cdf(-d1),
        };

        if price.is_finite() {
            // The CDF approximation can leave tiny negative values deep out of the money
            Ok(price.max(0.0))
        } else {
            Err(PricingError::InvalidModel(format!(
                "black-scholes price is not finite for strike {strike} and expiry {expiry}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_rejects_invalid_inputs() {
        assert!(BlackScholes::new(0.0, 0.05, 0.2, 0.0).is_err());
        assert!(BlackScholes::new(100.0, f64::NAN, 0.2, 0.0).is_err());
        assert!(BlackScholes::new(100.0, 0.05, -0.2, 0.0).is_err());
        assert!(BlackScholes::new(100.0, 0.05, 0.2, f64::INFINITY).is_err());
    }

    #[test]
    fn test_reference_call_price() {
        // Hull: S=100, K=100, r=5%, σ=20%, T=1 -> 10.4506
        let bs = BlackScholes::new(100.0, 0.05, 0.2, 0.0).unwrap();
        let call = bs.price(OptionType::Call, 100.0, 1.0).unwrap();
        assert_relative_eq!(call, 10.4506, epsilon = 1e-3);
    }

    #[test]
    fn test_reference_put_price() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2, 0.0).unwrap();
        let put = bs.price(OptionType::Put, 100.0, 1.0).unwrap();
        assert_relative_eq!(put, 5.5735, epsilon = 1e-3);
    }

    #[test]
    fn test_put_call_parity_with_dividends() {
        let bs = BlackScholes::new(100.0, 0.05, 0.25, 0.03).unwrap();
        for strike in [80.0, 100.0, 120.0] {
            let call = bs.price(OptionType::Call, strike, 2.0).unwrap();
            let put = bs.price(OptionType::Put, strike, 2.0).unwrap();
            let forward = 100.0 * (-0.03_f64 * 2.0).exp() - strike * (-0.05_f64 * 2.0).exp();
            assert_relative_eq!(call - put, forward, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_d2_relation() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2, 0.0).unwrap();
        assert_relative_eq!(bs.d1(105.0, 1.0) - bs.d2(105.0, 1.0), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_price_rejects_invalid_contract() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2, 0.0).unwrap();
        assert!(bs.price(OptionType::Call, 0.0, 1.0).is_err());
        assert!(bs.price(OptionType::Call, 100.0, 0.0).is_err());
    }
}
