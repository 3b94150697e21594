//! Shared grid configuration for the distribution models.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TpmOddsError;
use crate::types::{Rate, RateUnit};
use crate::TpmOddsResult;

/// Default spacing between candidate policy-rate levels (25bp in percent).
pub const DEFAULT_STEP: Decimal = dec!(0.25);

/// Steps on each side of the policy rate in the heuristic grid (9 levels).
pub const DEFAULT_HEURISTIC_HALF_STEPS: u32 = 4;

/// Widest grid accepted, in steps on each side of the centre.
pub const MAX_HALF_STEPS: u32 = 10_000;

/// How the heuristic model reads an implied rate for a meeting date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpliedRateLookup {
    /// Observation dated exactly on the meeting date; otherwise the column is empty.
    #[default]
    ExactDate,
    /// Linear interpolation over observations keyed by days from the valuation date.
    Interpolated,
}

/// Grid and quoting parameters consumed by both distribution models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// Distance between adjacent rate levels, in `rate_unit`.
    pub step: Rate,
    /// Half-width of the grid around the policy rate. When absent the
    /// heuristic uses ±4·step and the binomial model uses ±n·step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Rate>,
    /// Unit of every rate in the input (policy rate, quotes, step, span).
    pub rate_unit: RateUnit,
    /// Join policy between meeting dates and dated observations.
    pub implied_rate_lookup: ImpliedRateLookup,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        DistributionConfig {
            step: DEFAULT_STEP,
            span: None,
            rate_unit: RateUnit::Percent,
            implied_rate_lookup: ImpliedRateLookup::ExactDate,
        }
    }
}

impl DistributionConfig {
    pub fn with_step(step: Rate) -> Self {
        DistributionConfig {
            step,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> TpmOddsResult<()> {
        if self.step <= Decimal::ZERO {
            return Err(TpmOddsError::validation(
                "config.step",
                "Grid step must be positive",
            ));
        }
        if let Some(span) = self.span {
            if span < Decimal::ZERO {
                return Err(TpmOddsError::validation(
                    "config.span",
                    "Grid span cannot be negative",
                ));
            }
        }
        Ok(())
    }

    /// Number of steps on each side of the centre for a given span.
    pub(crate) fn half_steps(&self, span: Rate) -> TpmOddsResult<u32> {
        span.checked_div(self.step)
            .and_then(|k| k.floor().to_u32())
            .filter(|k| *k <= MAX_HALF_STEPS)
            .ok_or_else(|| {
                TpmOddsError::validation(
                    "config.span",
                    format!("Grid span is too wide for the step (at most {MAX_HALF_STEPS} steps per side)"),
                )
            })
    }
}

/// Evenly spaced levels `center + k·step` for `k` in `[-half_steps, half_steps]`,
/// sorted descending. Optionally rounded to `dp` decimal places.
pub fn policy_rate_grid(center: Rate, step: Rate, half_steps: u32, dp: Option<u32>) -> Vec<Rate> {
    let half = i64::from(half_steps);
    (-half..=half)
        .rev()
        .map(|k| {
            let level = center + Decimal::from(k) * step;
            match dp {
                Some(dp) => level.round_dp(dp),
                None => level.normalize(),
            }
        })
        .collect()
}
