mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::{BalanceArgs, LoanArgs};
use commands::refinance::RefinanceArgs;

/// Mortgage refinancing calculator
#[derive(Parser)]
#[command(
    name = "refi",
    version,
    about = "Mortgage refinancing and amortization calculator",
    long_about = "Estimate the effect of refinancing a mortgage: interest paid before and \
                  after the refinance and a blended effective annual rate. Also computes \
                  level payments, remaining balances and amortization schedules with \
                  decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation steps to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interest before/after refinancing and effective annual rate
    Refinance(RefinanceArgs),
    /// Monthly payment and lifetime interest of a loan
    Payment(LoanArgs),
    /// Remaining balance after a number of monthly payments
    Balance(BalanceArgs),
    /// Month-by-month amortization schedule
    Schedule(LoanArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout carries results; logs go to stderr
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Refinance(args) => commands::refinance::run_refinance(args),
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Balance(args) => commands::amortization::run_balance(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Version => {
            println!("refi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
