mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::curves::{ForwardRateArgs, SpotCurveArgs};
use commands::distribution::{BinomialArgs, HeuristicArgs};
use commands::market_data::SwapTableArgs;

/// Policy rate probabilities implied by the swap curve
#[derive(Parser)]
#[command(
    name = "tpm-odds",
    version,
    about = "Policy rate probabilities implied by the swap curve",
    long_about = "A CLI for turning average chamber swap rates into probability \
                  distributions for the monetary policy rate (TPM) at upcoming \
                  policy meetings. Supports spot curve construction, forward \
                  extraction, the inverse-distance heuristic and the binomial tree."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level when RUST_LOG is unset (logs go to stderr)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// YAML file with grid defaults (step, span, rate_unit, implied_rate_lookup)
    #[arg(long, global = true, env = "TPM_ODDS_CONFIG")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the TPM-anchored spot curve from swap quotes
    SpotCurve(SpotCurveArgs),
    /// Simple act/360 forward rate between two horizons
    ForwardRate(ForwardRateArgs),
    /// Inverse-distance heuristic distribution per meeting
    Heuristic(HeuristicArgs),
    /// Binomial tree distribution per meeting
    Binomial(BinomialArgs),
    /// Pivot saved swap series payloads into a rate table
    SwapTable(SwapTableArgs),
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

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = cli.config.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::SpotCurve(args) => commands::curves::run_spot_curve(args),
        Commands::ForwardRate(args) => commands::curves::run_forward_rate(args),
        Commands::Heuristic(args) => commands::distribution::run_heuristic(args, config),
        Commands::Binomial(args) => commands::distribution::run_binomial(args, config),
        Commands::SwapTable(args) => commands::market_data::run_swap_table(args),
        Commands::Version => {
            println!("tpm-odds {}", env!("CARGO_PKG_VERSION"));
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
