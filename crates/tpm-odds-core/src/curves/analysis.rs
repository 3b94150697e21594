//! Envelope-wrapped entry points for curve construction and forward extraction.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::forward::{forward_rate, interpolate_spot};
use super::spot_curve::{build_spot_curve_with_unit, SpotCurve, SwapQuote};
use crate::types::{with_metadata, ComputationOutput, Days, Rate, RateUnit};
use crate::TpmOddsResult;

/// Input for spot curve construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotCurveInput {
    pub quotes: Vec<SwapQuote>,
    /// Current policy rate (TPM), anchored at day 0
    pub current_policy_rate: Rate,
    #[serde(default)]
    pub rate_unit: RateUnit,
}

/// Input for a single forward rate between two horizons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardRateInput {
    #[serde(flatten)]
    pub curve: SpotCurveInput,
    pub start_days: Days,
    pub end_days: Days,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardRateOutput {
    pub start_days: Days,
    pub end_days: Days,
    pub start_spot: Rate,
    pub end_spot: Rate,
    /// `None` when the forward is undefined
    pub forward_rate: Option<Rate>,
}

pub fn analyze_spot_curve(input: &SpotCurveInput) -> TpmOddsResult<ComputationOutput<SpotCurve>> {
    let start = Instant::now();

    let curve = build_spot_curve_with_unit(&input.quotes, input.current_policy_rate, input.rate_unit)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Policy-Rate Anchored Spot Curve",
        &serde_json::json!({
            "anchor": "current policy rate at day 0",
            "interpolation": "linear in days, flat extrapolation",
            "rate_unit": input.rate_unit,
        }),
        Vec::new(),
        elapsed,
        curve,
    ))
}

pub fn analyze_forward_rate(
    input: &ForwardRateInput,
) -> TpmOddsResult<ComputationOutput<ForwardRateOutput>> {
    let start = Instant::now();
    let c = &input.curve;

    let curve = build_spot_curve_with_unit(&c.quotes, c.current_policy_rate, c.rate_unit)?;
    let fwd = forward_rate(&curve, input.start_days, input.end_days)?;

    let mut warnings = Vec::new();
    if fwd.is_none() {
        warnings.push(format!(
            "Forward rate from day {} to day {} is undefined",
            input.start_days, input.end_days
        ));
    }

    let output = ForwardRateOutput {
        start_days: input.start_days,
        end_days: input.end_days,
        start_spot: interpolate_spot(&curve, input.start_days),
        end_spot: interpolate_spot(&curve, input.end_days),
        forward_rate: fwd,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Simple Forward Rate (act/360)",
        &serde_json::json!({
            "day_count": "act/360",
            "compounding": "simple",
            "rounding": "4dp, half to even",
            "rate_unit": c.rate_unit,
        }),
        warnings,
        elapsed,
        output,
    ))
}
