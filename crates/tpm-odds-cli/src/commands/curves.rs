use clap::Args;
use serde_json::Value;

use tpm_odds_core::curves::{self, ForwardRateInput, SpotCurveInput};

use crate::input;

#[derive(Args)]
pub struct SpotCurveArgs {
    /// JSON with `quotes`, `current_policy_rate` and optional `rate_unit`
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct ForwardRateArgs {
    /// JSON with the curve fields plus `start_days` and `end_days`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_spot_curve(args: SpotCurveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::read_input(args.input.as_deref(), "spot curve construction")?;
    let curve_input: SpotCurveInput = serde_json::from_value(data)?;
    let result = curves::analyze_spot_curve(&curve_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_forward_rate(args: ForwardRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::read_input(args.input.as_deref(), "forward rate extraction")?;
    let fwd_input: ForwardRateInput = serde_json::from_value(data)?;
    let result = curves::analyze_forward_rate(&fwd_input)?;
    Ok(serde_json::to_value(result)?)
}
