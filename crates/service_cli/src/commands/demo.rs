//! `pricer demo`: European call and American put on the reference contract.

use pricer_core::{ExerciseStyle, OptionType};
use pricer_pricing::lattice::{price_lattice, LatticeParams};

use crate::Result;

/// Prices of the two demo contracts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoPrices {
    pub european_call: f64,
    pub american_put: f64,
}

pub fn evaluate() -> Result<DemoPrices> {
    let call = LatticeParams::default();
    let put = LatticeParams {
        option_type: OptionType::Put,
        exercise: ExerciseStyle::American,
        ..call
    };

    Ok(DemoPrices {
        european_call: price_lattice(&call)?,
        american_put: price_lattice(&put)?,
    })
}

pub fn run() -> Result<()> {
    let params = LatticeParams::default();
    let prices = evaluate()?;

    println!(
        "S0={} K={} r={} sigma={} T={} N={}",
        params.spot, params.strike, params.rate, params.volatility, params.maturity, params.steps
    );
    println!("European call price: {:.4}", prices.european_call);
    println!("American put price:  {:.4}", prices.american_put);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_demo_prices() {
        let prices = evaluate().unwrap();
        assert_abs_diff_eq!(prices.european_call, 8.02, epsilon = 0.1);
        // American put is worth at least its european counterpart (~7.9).
        assert!(prices.american_put > 7.5);
    }
}
