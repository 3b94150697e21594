use napi::Result as NapiResult;
use napi_derive::napi;

use tpm_odds_core::curves::{self, ForwardRateInput, SpotCurveInput};
use tpm_odds_core::distribution::{self, BinomialInput, HeuristicInput, ImpliedPathInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

#[napi]
pub fn build_spot_curve(input_json: String) -> NapiResult<String> {
    let input: SpotCurveInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = curves::analyze_spot_curve(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn forward_rate(input_json: String) -> NapiResult<String> {
    let input: ForwardRateInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = curves::analyze_forward_rate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

#[napi]
pub fn heuristic_distribution(input_json: String) -> NapiResult<String> {
    let input: HeuristicInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = distribution::analyze_heuristic(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// The valuation date is required here; bindings never read the clock.
#[napi]
pub fn binomial_distribution(input_json: String) -> NapiResult<String> {
    let input: BinomialInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = distribution::analyze_binomial(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn implied_path(input_json: String) -> NapiResult<String> {
    let input: ImpliedPathInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = distribution::analyze_implied_path(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
