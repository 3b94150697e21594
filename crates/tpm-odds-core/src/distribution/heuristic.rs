//! Inverse-distance heuristic over swap-implied rates.
//!
//! For every meeting the swap-implied rate is compared with each candidate
//! level; mass is proportional to `1 / (|level − implied| + ε)` and the column
//! is normalised to one. By default the implied rate is read from the
//! observation dated exactly on the meeting day. Meetings without a match
//! keep an all-zero column.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::grid::{
    policy_rate_grid, DistributionConfig, ImpliedRateLookup, DEFAULT_HEURISTIC_HALF_STEPS,
};
use super::matrix::{ProbabilityMatrix, SkipReason, PROBABILITY_DP};
use crate::curves::{build_spot_curve_with_unit, interpolate_spot, SpotCurve, SwapQuote};
use crate::error::TpmOddsError;
use crate::types::{days_between, Rate, RateUnit};
use crate::TpmOddsResult;

/// Additive distance floor, in percentage points.
const DISTANCE_EPSILON_PCT: Decimal = dec!(0.01);

/// A swap-implied rate observed on a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpliedRateObservation {
    pub date: NaiveDate,
    pub rate: Rate,
}

/// Heuristic distribution, probabilities rounded to 2 decimals.
///
/// `valuation_date` is only read by [`ImpliedRateLookup::Interpolated`].
pub fn heuristic_distribution(
    observations: &[ImpliedRateObservation],
    meetings: &[NaiveDate],
    current_policy_rate: Rate,
    valuation_date: Option<NaiveDate>,
    config: &DistributionConfig,
) -> TpmOddsResult<ProbabilityMatrix> {
    heuristic_distribution_unrounded(
        observations,
        meetings,
        current_policy_rate,
        valuation_date,
        config,
    )
    .map(|m| m.rounded(PROBABILITY_DP))
}

/// Heuristic distribution without the final rounding; every populated column
/// sums to one.
///
/// `valuation_date` is only read by [`ImpliedRateLookup::Interpolated`].
pub fn heuristic_distribution_unrounded(
    observations: &[ImpliedRateObservation],
    meetings: &[NaiveDate],
    current_policy_rate: Rate,
    valuation_date: Option<NaiveDate>,
    config: &DistributionConfig,
) -> TpmOddsResult<ProbabilityMatrix> {
    config.validate()?;
    let lookup = ImpliedRates::new(observations, current_policy_rate, valuation_date, config)?;

    let half_steps = match config.span {
        Some(span) => config.half_steps(span)?,
        None => DEFAULT_HEURISTIC_HALF_STEPS,
    };
    let levels = policy_rate_grid(
        current_policy_rate,
        config.step,
        half_steps,
        Some(grid_dp(config.rate_unit)),
    );
    let epsilon = DISTANCE_EPSILON_PCT * config.rate_unit.scale() / Decimal::ONE_HUNDRED;

    let mut matrix = ProbabilityMatrix::zeros(levels, meetings.to_vec());

    for (j, meeting) in meetings.iter().enumerate() {
        let implied = match lookup.rate_for(*meeting) {
            Ok(rate) => rate,
            Err(reason) => {
                matrix.skip(j, reason);
                continue;
            }
        };

        let weights: Vec<Decimal> = matrix
            .levels
            .iter()
            .map(|level| Decimal::ONE / ((*level - implied).abs() + epsilon))
            .collect();
        let total: Decimal = weights.iter().sum();

        for (row, w) in weights.iter().enumerate() {
            matrix.set(row, j, *w / total);
        }

        tracing::debug!(
            %meeting,
            %implied,
            most_likely = ?matrix.most_likely(j),
            "heuristic column"
        );
    }

    Ok(matrix)
}

/// Decimal places of heuristic grid levels: two in percent, four in fractions.
fn grid_dp(unit: RateUnit) -> u32 {
    match unit {
        RateUnit::Percent => 2,
        RateUnit::Fraction => 4,
    }
}

/// Resolves the implied rate for a meeting under the configured join policy.
enum ImpliedRates {
    Exact(HashMap<NaiveDate, Rate>),
    Interpolated {
        curve: SpotCurve,
        valuation_date: NaiveDate,
    },
}

impl ImpliedRates {
    fn new(
        observations: &[ImpliedRateObservation],
        current_policy_rate: Rate,
        valuation_date: Option<NaiveDate>,
        config: &DistributionConfig,
    ) -> TpmOddsResult<Self> {
        let mut by_date: HashMap<NaiveDate, Rate> = HashMap::with_capacity(observations.len());
        for (i, obs) in observations.iter().enumerate() {
            if by_date.insert(obs.date, obs.rate).is_some() {
                return Err(TpmOddsError::validation(
                    format!("observations[{i}].date"),
                    format!("duplicate observation for {}", obs.date),
                ));
            }
        }

        match config.implied_rate_lookup {
            ImpliedRateLookup::ExactDate => Ok(ImpliedRates::Exact(by_date)),
            ImpliedRateLookup::Interpolated => {
                let valuation_date = valuation_date.ok_or_else(|| {
                    TpmOddsError::validation(
                        "valuation_date",
                        "Interpolated lookup requires a valuation date",
                    )
                })?;
                let quotes: Vec<SwapQuote> = observations
                    .iter()
                    .map(|obs| (days_between(valuation_date, obs.date), obs.rate))
                    .filter(|(days, _)| *days > 0)
                    .map(|(days, rate)| SwapQuote::days(days, rate))
                    .collect();
                let curve =
                    build_spot_curve_with_unit(&quotes, current_policy_rate, config.rate_unit)?;
                Ok(ImpliedRates::Interpolated {
                    curve,
                    valuation_date,
                })
            }
        }
    }

    fn rate_for(&self, meeting: NaiveDate) -> Result<Rate, SkipReason> {
        match self {
            ImpliedRates::Exact(by_date) => by_date
                .get(&meeting)
                .copied()
                .ok_or(SkipReason::MissingImpliedRate),
            ImpliedRates::Interpolated {
                curve,
                valuation_date,
            } => {
                let days = days_between(*valuation_date, meeting);
                if days <= 0 {
                    return Err(SkipReason::MeetingPassed);
                }
                Ok(interpolate_spot(curve, days))
            }
        }
    }
}
