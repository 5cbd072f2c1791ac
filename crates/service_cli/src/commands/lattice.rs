//! `pricer lattice`: CRR binomial tree price of a vanilla option.

use clap::Args;
use pricer_core::{ExerciseStyle, OptionType};
use pricer_models::analytical::BlackScholes;
use pricer_pricing::lattice::{price_lattice, LatticeParams};
use tracing::{debug, info};

use crate::{CliError, Result};

#[derive(Args, Debug, Clone)]
pub struct LatticeArgs {
    /// Current underlying price
    #[arg(long, default_value_t = 100.0)]
    pub spot: f64,

    /// Strike price
    #[arg(long, default_value_t = 105.0)]
    pub strike: f64,

    /// Continuously compounded risk-free rate
    #[arg(long, default_value_t = 0.05)]
    pub rate: f64,

    /// Annualised volatility
    #[arg(long, default_value_t = 0.2)]
    pub volatility: f64,

    /// Time to maturity in years
    #[arg(long, default_value_t = 1.0)]
    pub maturity: f64,

    /// Number of tree steps
    #[arg(long, default_value_t = 100)]
    pub steps: usize,

    /// call or put
    #[arg(long, default_value = "call")]
    pub option_type: OptionType,

    /// european or american
    #[arg(long, default_value = "european")]
    pub exercise: ExerciseStyle,

    /// Continuous dividend yield
    #[arg(long, default_value_t = 0.0)]
    pub dividend_yield: f64,

    /// Also print the Black-Scholes price (european only)
    #[arg(long)]
    pub compare: bool,
}

impl LatticeArgs {
    pub fn params(&self) -> LatticeParams {
        LatticeParams {
            spot: self.spot,
            strike: self.strike,
            rate: self.rate,
            volatility: self.volatility,
            maturity: self.maturity,
            steps: self.steps,
            option_type: self.option_type,
            exercise: self.exercise,
            dividend_yield: self.dividend_yield,
        }
    }
}

/// Lattice price and, when requested, its closed-form reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeOutcome {
    pub price: f64,
    pub black_scholes: Option<f64>,
}

pub fn evaluate(args: &LatticeArgs) -> Result<LatticeOutcome> {
    let params = args.params();
    debug!(?params, "Pricing on binomial lattice");
    let price = price_lattice(&params)?;

    let black_scholes = if args.compare {
        if args.exercise.allows_early_exercise() {
            return Err(CliError::InvalidArgument(
                "--compare is only available for european exercise".to_string(),
            ));
        }
        let model = BlackScholes::new(args.spot, args.rate, args.volatility, args.dividend_yield)?;
        Some(model.price(args.option_type, args.strike, args.maturity)?)
    } else {
        None
    };

    Ok(LatticeOutcome {
        price,
        black_scholes,
    })
}

pub fn run(args: &LatticeArgs) -> Result<()> {
    let outcome = evaluate(args)?;
    info!(price = outcome.price, "Lattice price computed");

    println!(
        "{} {} option, {} steps: {:.4}",
        args.exercise, args.option_type, args.steps, outcome.price
    );
    if let Some(reference) = outcome.black_scholes {
        println!("Black-Scholes: {:.4}", reference);
        println!("Difference:    {:+.4}", outcome.price - reference);
    }
    Ok(())
}
