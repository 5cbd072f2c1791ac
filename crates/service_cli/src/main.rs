//! Pricer CLI - command line access to the option pricers
//!
//! # Commands
//!
//! - `pricer lattice` - CRR binomial tree price of a vanilla option
//! - `pricer monte-carlo` - GBM Monte Carlo price of an expression payoff
//! - `pricer demo` - European call and American put on the reference contract
//!
//! Logs go to stderr. `-v` raises the level to debug; `RUST_LOG` overrides
//! both.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;

pub use error::{CliError, Result};

/// Option pricing from the command line
#[derive(Parser)]
#[command(name = "pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a vanilla option on a binomial lattice
    Lattice(commands::lattice::LatticeArgs),

    /// Price a path payoff by Monte Carlo simulation
    MonteCarlo(commands::monte_carlo::MonteCarloArgs),

    /// Price the demo contracts
    Demo,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Lattice(args) => commands::lattice::run(&args),
        Commands::MonteCarlo(args) => commands::monte_carlo::run(&args),
        Commands::Demo => commands::demo::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_names() {
        let cli = Cli::parse_from(["pricer", "-v", "monte-carlo", "--seed", "3"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::MonteCarlo(ref args) if args.seed == Some(3)));

        let cli = Cli::parse_from(["pricer", "lattice", "--compare"]);
        assert!(matches!(cli.command, Commands::Lattice(ref args) if args.compare));

        let cli = Cli::parse_from(["pricer", "demo"]);
        assert!(matches!(cli.command, Commands::Demo));
    }
}
