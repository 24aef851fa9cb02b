mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::compare::CompareArgs;
use commands::loan::LoanArgs;
use commands::profile::ProfileArgs;
use commands::residual::ResidualArgs;

/// After-tax vehicle total cost of ownership
#[derive(Parser)]
#[command(
    name = "tco",
    version,
    about = "After-tax vehicle total cost of ownership",
    long_about = "Compares the real, after-tax cost of acquiring a vehicle by outright \
                  purchase, finance leasing or long-term rental, applying VAT recovery, \
                  income-tax deductions, amortizable caps and residual value for the \
                  client's fiscal regime."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare purchase, leasing and long-term rental
    Compare(CompareArgs),
    /// Resolve the fiscal profile of a client category
    Profile(ProfileArgs),
    /// Amortize a purchase loan (French method)
    Loan(LoanArgs),
    /// Estimate the residual value of a vehicle
    Residual(ResidualArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Logs go to stderr so they never mix with command output.
/// `RUST_LOG=vehicle_tco_core=debug` shows each resolved profile and channel.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Profile(args) => commands::profile::run_profile(args),
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Residual(args) => commands::residual::run_residual(args),
        Commands::Version => {
            println!("tco {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
