//! `pricer monte-carlo`: GBM simulation of an expression payoff.

use clap::Args;
use pricer_models::payoff::compile_payoff;
use pricer_pricing::mc::{Execution, GbmParams, MonteCarloConfig, MonteCarloPricer, PricingResult};
use tracing::{debug, info};

use crate::Result;

#[derive(Args, Debug, Clone)]
pub struct MonteCarloArgs {
    /// Initial underlying price
    #[arg(long, default_value_t = 100.0)]
    pub spot: f64,

    /// Strike, available to the payoff as `strike`
    #[arg(long, default_value_t = 100.0)]
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

    /// Time steps per path
    #[arg(long, default_value_t = 50)]
    pub steps: usize,

    /// Number of simulated paths
    #[arg(long, default_value_t = 50_000)]
    pub paths: usize,

    /// Continuous dividend yield
    #[arg(long, default_value_t = 0.0)]
    pub dividend_yield: f64,

    /// Payoff expression over `path`, `s`, `spot`, `step` and `strike`
    #[arg(long, default_value = "max(s - strike, 0)")]
    pub payoff: String,

    /// Master seed; omitted means a fresh random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulate on the calling thread only
    #[arg(long)]
    pub sequential: bool,
}

impl MonteCarloArgs {
    pub fn gbm(&self) -> GbmParams {
        GbmParams {
            spot: self.spot,
            rate: self.rate,
            volatility: self.volatility,
            dividend_yield: self.dividend_yield,
            maturity: self.maturity,
        }
    }
}

pub fn evaluate(args: &MonteCarloArgs) -> Result<PricingResult> {
    let payoff = compile_payoff(&args.payoff, [("strike", args.strike)])?;
    let execution = if args.sequential {
        Execution::Sequential
    } else {
        Execution::Parallel
    };
    let config = MonteCarloConfig::builder()
        .n_paths(args.paths)
        .n_steps(args.steps)
        .maybe_seed(args.seed)
        .execution(execution)
        .build()?;

    debug!(payoff = payoff.source(), ?execution, "Running Monte Carlo");
    Ok(MonteCarloPricer::new(config)?.price(&args.gbm(), &payoff)?)
}

pub fn run(args: &MonteCarloArgs) -> Result<()> {
    let result = evaluate(args)?;
    info!(
        price = result.price,
        std_error = result.std_error,
        seed = result.seed,
        "Monte Carlo price computed"
    );

    println!("Estimated price: {:.4}", result.price);
    println!(
        "Standard error:  {:.4} (95% CI ±{:.4})",
        result.std_error,
        result.confidence_95()
    );
    println!("Seed:            {}", result.seed);
    Ok(())
}
