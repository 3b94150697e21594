//! Top-level entry points wrapping the distribution models in the standard
//! computation envelope.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::binomial::{run_binomial, BinomialOutput};
use super::grid::DistributionConfig;
use super::heuristic::{heuristic_distribution, ImpliedRateObservation};
use super::matrix::{ProbabilityMatrix, PROBABILITY_DP};
use crate::curves::SwapQuote;
use crate::types::{with_metadata, ComputationOutput, Rate};
use crate::TpmOddsResult;

/// Input for the inverse-distance heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicInput {
    /// Swap-implied rate per calendar date
    pub observations: Vec<ImpliedRateObservation>,
    /// Monetary policy meeting dates, in display order
    pub meetings: Vec<NaiveDate>,
    /// Current policy rate (TPM)
    pub current_policy_rate: Rate,
    /// Required only for interpolated lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_date: Option<NaiveDate>,
    #[serde(default)]
    pub config: DistributionConfig,
}

/// Input for the binomial tree model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinomialInput {
    /// Swap quotes by tenor for the curve date
    pub quotes: Vec<SwapQuote>,
    /// Monetary policy meeting dates, in display order
    pub meetings: Vec<NaiveDate>,
    /// Current policy rate (TPM)
    pub current_policy_rate: Rate,
    /// Date the curve is observed; horizons are measured from it
    pub valuation_date: NaiveDate,
    #[serde(default)]
    pub config: DistributionConfig,
}

/// Selects which distribution model to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DistributionModel {
    Heuristic(HeuristicInput),
    Binomial(BinomialInput),
}

/// Top-level input for implied policy path analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpliedPathInput {
    pub model: DistributionModel,
}

/// Top-level output wrapping model-specific results.
#[derive(Debug, Clone, Serialize)]
pub enum ImpliedPathOutput {
    Heuristic(ProbabilityMatrix),
    Binomial(BinomialOutput),
}

const HEURISTIC_METHOD: &str = "Inverse-Distance Heuristic over Swap-Implied Rates";
const BINOMIAL_METHOD: &str = "Recombining Binomial Tree Driven by Swap-Implied Forwards";

/// Run the heuristic model and wrap it with metadata.
pub fn analyze_heuristic(
    input: &HeuristicInput,
) -> TpmOddsResult<ComputationOutput<ProbabilityMatrix>> {
    let start = Instant::now();

    let matrix = heuristic_distribution(
        &input.observations,
        &input.meetings,
        input.current_policy_rate,
        input.valuation_date,
        &input.config,
    )?;
    let warnings = matrix.skipped.iter().map(|s| s.describe()).collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        HEURISTIC_METHOD,
        &heuristic_assumptions(&input.config),
        warnings,
        elapsed,
        matrix,
    ))
}

/// Run the binomial model and wrap it with metadata.
pub fn analyze_binomial(
    input: &BinomialInput,
) -> TpmOddsResult<ComputationOutput<BinomialOutput>> {
    let start = Instant::now();

    let mut output = run_binomial(
        &input.quotes,
        &input.meetings,
        input.current_policy_rate,
        input.valuation_date,
        &input.config,
    )?;
    output.matrix = output.matrix.rounded(PROBABILITY_DP);
    let warnings = output.matrix.skipped.iter().map(|s| s.describe()).collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        BINOMIAL_METHOD,
        &binomial_assumptions(&input.config, input.valuation_date),
        warnings,
        elapsed,
        output,
    ))
}

/// Run whichever model the input selects.
pub fn analyze_implied_path(
    input: &ImpliedPathInput,
) -> TpmOddsResult<ComputationOutput<ImpliedPathOutput>> {
    match &input.model {
        DistributionModel::Heuristic(h) => {
            let out = analyze_heuristic(h)?;
            Ok(rewrap(out, ImpliedPathOutput::Heuristic))
        }
        DistributionModel::Binomial(b) => {
            let out = analyze_binomial(b)?;
            Ok(rewrap(out, ImpliedPathOutput::Binomial))
        }
    }
}

fn rewrap<T: Serialize, U: Serialize>(
    out: ComputationOutput<T>,
    f: impl FnOnce(T) -> U,
) -> ComputationOutput<U> {
    ComputationOutput {
        result: f(out.result),
        methodology: out.methodology,
        assumptions: out.assumptions,
        warnings: out.warnings,
        metadata: out.metadata,
    }
}

fn heuristic_assumptions(config: &DistributionConfig) -> serde_json::Value {
    serde_json::json!({
        "math_precision": "rust_decimal_128bit",
        "step": config.step,
        "span": config.span,
        "rate_unit": config.rate_unit,
        "implied_rate_lookup": config.implied_rate_lookup,
        "weighting": "1 / (|level - implied| + 0.01pp)",
        "probability_rounding": "2dp, half to even, after normalisation",
    })
}

fn binomial_assumptions(config: &DistributionConfig, valuation_date: NaiveDate) -> serde_json::Value {
    serde_json::json!({
        "math_precision": "rust_decimal_128bit",
        "step": config.step,
        "span": config.span,
        "rate_unit": config.rate_unit,
        "valuation_date": valuation_date,
        "day_count": "act/360",
        "forward": "simple, from day 0 to meeting",
        "probability_rounding": "2dp, half to even",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::matrix::SkipReason;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn binomial_input() -> BinomialInput {
        BinomialInput {
            quotes: vec![
                SwapQuote::days(90, dec!(4.70)),
                SwapQuote::labelled("M06", dec!(4.55)),
                SwapQuote::labelled("AN01", dec!(4.40)),
            ],
            meetings: vec![d(2025, 8, 1), d(2025, 10, 28), d(2025, 12, 16)],
            current_policy_rate: dec!(4.75),
            valuation_date: d(2025, 8, 29),
            config: DistributionConfig::default(),
        }
    }

    #[test]
    fn test_analyze_binomial_envelope() {
        let out = analyze_binomial(&binomial_input()).unwrap();
        assert_eq!(out.methodology, BINOMIAL_METHOD);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("2025-08-01"));
        assert_eq!(out.result.forward_rates.len(), 3);
        assert_eq!(out.result.matrix.levels.len(), 7);
        assert_eq!(out.result.matrix.skipped[0].reason, SkipReason::MeetingPassed);
        assert_eq!(out.assumptions["day_count"], "act/360");
    }

    #[test]
    fn test_analyze_binomial_downward_curve_populates_lower_levels() {
        let out = analyze_binomial(&binomial_input()).unwrap();
        let m = &out.result.matrix;
        assert!(m.probability(dec!(5.0), 1).unwrap().is_zero());
        assert!(!m.probability(dec!(4.5), 1).unwrap().is_zero());
    }

    #[test]
    fn test_analyze_heuristic_envelope() {
        let input = HeuristicInput {
            observations: vec![ImpliedRateObservation {
                date: d(2025, 9, 9),
                rate: dec!(4.6),
            }],
            meetings: vec![d(2025, 9, 9), d(2025, 10, 28)],
            current_policy_rate: dec!(4.75),
            valuation_date: None,
            config: DistributionConfig::default(),
        };
        let out = analyze_heuristic(&input).unwrap();
        assert_eq!(out.methodology, HEURISTIC_METHOD);
        assert_eq!(out.warnings, vec!["Meeting 2025-10-28 skipped: no implied rate for the meeting date".to_string()]);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_implied_path_from_json() {
        let json = r#"{
            "model": {
                "Binomial": {
                    "quotes": [{"tenor": 90, "rate": "4.70"}, {"tenor": "AN01", "rate": 4.40}],
                    "meetings": ["2025-10-28"],
                    "current_policy_rate": 4.75,
                    "valuation_date": "2025-08-29"
                }
            }
        }"#;
        let input: ImpliedPathInput = serde_json::from_str(json).unwrap();
        let out = analyze_implied_path(&input).unwrap();
        match out.result {
            ImpliedPathOutput::Binomial(b) => {
                assert_eq!(b.matrix.levels.len(), 3);
                assert_eq!(b.forward_rates[0].trials, 1);
            }
            other => panic!("expected binomial output, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_error_before_computation() {
        let mut input = binomial_input();
        input.config.step = dec!(0);
        assert!(analyze_binomial(&input).is_err());
    }
}
