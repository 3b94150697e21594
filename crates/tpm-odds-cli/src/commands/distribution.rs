use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use tpm_odds_core::distribution::{self, BinomialInput, HeuristicInput};

use crate::input::{self, config};

#[derive(Args)]
pub struct HeuristicArgs {
    /// JSON with `observations`, `meetings`, `current_policy_rate` and optional `config`
    #[arg(long)]
    pub input: Option<String>,

    /// Grid step, overriding the input and config file
    #[arg(long)]
    pub step: Option<Decimal>,

    /// Valuation date for interpolated lookup (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub valuation_date: Option<NaiveDate>,
}

#[derive(Args)]
pub struct BinomialArgs {
    /// JSON with `quotes`, `meetings`, `current_policy_rate` and optional `config`
    #[arg(long)]
    pub input: Option<String>,

    /// Grid step, overriding the input and config file
    #[arg(long)]
    pub step: Option<Decimal>,

    /// Curve date horizons are measured from (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub valuation_date: Option<NaiveDate>,
}

pub fn run_heuristic(
    args: HeuristicArgs,
    config_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut data = input::read_input(args.input.as_deref(), "the heuristic distribution")?;
    config::apply_config(&mut data, config_path, args.step)?;
    config::apply_valuation_date(&mut data, args.valuation_date)?;

    let h_input: HeuristicInput = serde_json::from_value(data)?;
    let result = distribution::analyze_heuristic(&h_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_binomial(
    args: BinomialArgs,
    config_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut data = input::read_input(args.input.as_deref(), "the binomial distribution")?;
    config::apply_config(&mut data, config_path, args.step)?;
    config::apply_valuation_date(&mut data, args.valuation_date)?;

    let b_input: BinomialInput = serde_json::from_value(data)?;
    let result = distribution::analyze_binomial(&b_input)?;
    Ok(serde_json::to_value(result)?)
}
