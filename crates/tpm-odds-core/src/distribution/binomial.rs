//! Recombining binomial tree driven by swap-implied forwards.
//!
//! Meeting `j` (1-based, input order) is modelled as `j` independent moves of
//! one grid step. The per-move probability comes from the distance between the
//! forward rate to the meeting and the current policy rate, measured in steps
//! and clamped to [0, 1]. A forward at or above the policy rate only populates
//! levels at or above it, and a forward below only populates levels at or
//! below it; the two directions are never blended within a column.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use super::grid::{policy_rate_grid, DistributionConfig};
use super::matrix::{ProbabilityMatrix, SkipReason, PROBABILITY_DP};
use crate::curves::{build_spot_curve_with_unit, forward_rate, SpotCurve, SwapQuote};
use crate::error::TpmOddsError;
use crate::types::{days_between, Days, Probability, Rate};
use crate::TpmOddsResult;

/// Largest meeting count for which binomial coefficients stay exact in 96-bit decimals.
pub const MAX_MEETINGS: usize = 64;

/// Direction of the single-step move implied by the forward rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Forward rate and step probability resolved for one meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingForward {
    pub meeting: NaiveDate,
    /// Days from the valuation date; non-positive for past meetings
    pub days: Days,
    /// Number of binomial trials (1-based meeting index)
    pub trials: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<MoveDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_probability: Option<Probability>,
}

/// Everything the binomial model resolves on the way to its matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinomialOutput {
    pub spot_curve: SpotCurve,
    pub forward_rates: Vec<MeetingForward>,
    pub matrix: ProbabilityMatrix,
}

/// Binomial distribution, probabilities rounded to 2 decimals.
pub fn binomial_distribution(
    quotes: &[SwapQuote],
    meetings: &[NaiveDate],
    current_policy_rate: Rate,
    valuation_date: NaiveDate,
    config: &DistributionConfig,
) -> TpmOddsResult<ProbabilityMatrix> {
    binomial_distribution_unrounded(quotes, meetings, current_policy_rate, valuation_date, config)
        .map(|m| m.rounded(PROBABILITY_DP))
}

/// Binomial distribution without rounding. Columns sum to one whenever the
/// grid is wide enough to hold every reachable level.
pub fn binomial_distribution_unrounded(
    quotes: &[SwapQuote],
    meetings: &[NaiveDate],
    current_policy_rate: Rate,
    valuation_date: NaiveDate,
    config: &DistributionConfig,
) -> TpmOddsResult<ProbabilityMatrix> {
    run_binomial(quotes, meetings, current_policy_rate, valuation_date, config)
        .map(|out| out.matrix)
}

/// Run the model and keep the intermediate curve and per-meeting forwards.
pub fn run_binomial(
    quotes: &[SwapQuote],
    meetings: &[NaiveDate],
    current_policy_rate: Rate,
    valuation_date: NaiveDate,
    config: &DistributionConfig,
) -> TpmOddsResult<BinomialOutput> {
    config.validate()?;
    if meetings.len() > MAX_MEETINGS {
        return Err(TpmOddsError::validation(
            "meetings",
            format!("At most {MAX_MEETINGS} meetings are supported"),
        ));
    }

    let curve = build_spot_curve_with_unit(quotes, current_policy_rate, config.rate_unit)?;

    let n = meetings.len();
    let step = config.step;
    let half_steps = match config.span {
        Some(span) => config.half_steps(span)?,
        None => n as u32,
    };
    let levels = policy_rate_grid(current_policy_rate, step, half_steps, None);
    let mut matrix = ProbabilityMatrix::zeros(levels, meetings.to_vec());
    let mut forwards = Vec::with_capacity(n);

    for (col, meeting) in meetings.iter().enumerate() {
        let trials = (col + 1) as u32;
        let days = days_between(valuation_date, *meeting);
        let mut resolved = MeetingForward {
            meeting: *meeting,
            days,
            trials,
            forward_rate: None,
            direction: None,
            step_probability: None,
        };

        if days <= 0 {
            matrix.skip(col, SkipReason::MeetingPassed);
            forwards.push(resolved);
            continue;
        }

        let fwd = match forward_rate(&curve, 0, days)? {
            Some(f) => f,
            None => {
                matrix.skip(col, SkipReason::UndefinedForward);
                forwards.push(resolved);
                continue;
            }
        };

        let (direction, gap) = if fwd >= current_policy_rate {
            (MoveDirection::Up, fwd - current_policy_rate)
        } else {
            (MoveDirection::Down, current_policy_rate - fwd)
        };
        // A gap too large to express in steps is beyond one step anyway.
        let p = gap.checked_div(step).map_or(Decimal::ONE, clamp_unit);

        for row in 0..matrix.levels.len() {
            let level = matrix.levels[row];
            let offset = match direction {
                MoveDirection::Up => level - current_policy_rate,
                MoveDirection::Down => current_policy_rate - level,
            };
            let count = match offset.checked_div(step).and_then(|d| d.round().to_i64()) {
                Some(c) if (0..=i64::from(trials)).contains(&c) => c as u32,
                _ => continue,
            };
            matrix.set(row, col, binomial_pmf(trials, count, p));
        }

        tracing::debug!(
            %meeting,
            days,
            trials,
            forward = %fwd,
            ?direction,
            step_probability = %p,
            "binomial column"
        );

        resolved.forward_rate = Some(fwd);
        resolved.direction = Some(direction);
        resolved.step_probability = Some(p);
        forwards.push(resolved);
    }

    Ok(BinomialOutput {
        spot_curve: curve,
        forward_rates: forwards,
        matrix,
    })
}

fn clamp_unit(x: Decimal) -> Decimal {
    x.max(Decimal::ZERO).min(Decimal::ONE)
}

/// `C(n, k)` as an exact decimal.
pub fn binomial_coefficient(n: u32, k: u32) -> Decimal {
    if k > n {
        return Decimal::ZERO;
    }
    let k = k.min(n - k);
    let mut c: u128 = 1;
    for i in 0..k {
        c = c * u128::from(n - i) / u128::from(i + 1);
    }
    u64::try_from(c).map(Decimal::from).unwrap_or(Decimal::MAX)
}

/// `C(n, k) · p^k · (1 − p)^(n − k)`.
pub fn binomial_pmf(n: u32, k: u32, p: Probability) -> Probability {
    if k > n {
        return Decimal::ZERO;
    }
    let q = Decimal::ONE - p;
    binomial_coefficient(n, k) * p.powu(u64::from(k)) * q.powu(u64::from(n - k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn valuation() -> NaiveDate {
        d(2025, 8, 29)
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal, label: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "{label}: expected ~{expected}, got {actual} (diff {diff} > tolerance {tolerance})"
        );
    }

    /// Curve anchored at 5.00 with a single 90-day point.
    fn quotes(rate_90: Decimal) -> Vec<SwapQuote> {
        vec![SwapQuote::days(90, rate_90)]
    }

    #[test]
    fn test_binomial_coefficients() {
        assert_eq!(binomial_coefficient(4, 0), dec!(1));
        assert_eq!(binomial_coefficient(4, 2), dec!(6));
        assert_eq!(binomial_coefficient(10, 3), dec!(120));
        assert_eq!(binomial_coefficient(3, 5), dec!(0));
        assert_eq!(binomial_coefficient(64, 32), Decimal::from(1_832_624_140_942_590_534u64));
    }

    #[test]
    fn test_pmf_sums_to_one() {
        let p = dec!(0.3);
        let total: Decimal = (0..=5).map(|k| binomial_pmf(5, k, p)).sum();
        assert_close(total, Decimal::ONE, dec!(0.0000000001), "pmf total");
    }

    #[test]
    fn test_grid_has_2n_plus_1_levels() {
        let meetings = [d(2025, 9, 9), d(2025, 10, 28), d(2025, 12, 16)];
        let m = binomial_distribution(&quotes(dec!(5)), &meetings, dec!(5), valuation(), &Default::default())
            .unwrap();
        assert_eq!(m.levels.len(), 7);
        assert_eq!(m.levels[0], dec!(5.75));
        assert_eq!(m.levels[6], dec!(4.25));
    }

    #[test]
    fn test_single_meeting_upward_drift() {
        // 90-day meeting, flat-at-anchor start, 90-day rate 5.10 -> forward 5.10.
        // p_up = 0.10 / 0.25 = 0.4
        let meeting = d(2025, 11, 27);
        let m = binomial_distribution_unrounded(
            &quotes(dec!(5.10)),
            &[meeting],
            dec!(5),
            valuation(),
            &Default::default(),
        )
        .unwrap();
        assert_eq!(m.column_sum(0), Decimal::ONE);
        assert_eq!(m.probability(dec!(5.25), 0), Some(dec!(0.4)));
        assert_eq!(m.probability(dec!(5), 0), Some(dec!(0.6)));
        assert_eq!(m.probability(dec!(4.75), 0), Some(Decimal::ZERO));
        let non_zero = m.column(0).iter().filter(|p| !p.is_zero()).count();
        assert_eq!(non_zero, 2);
    }

    #[test]
    fn test_single_meeting_downward_drift() {
        // forward 4.80 -> p_down = 0.20 / 0.25 = 0.8
        let meeting = d(2025, 11, 27);
        let m = binomial_distribution_unrounded(
            &quotes(dec!(4.80)),
            &[meeting],
            dec!(5),
            valuation(),
            &Default::default(),
        )
        .unwrap();
        assert_eq!(m.probability(dec!(4.75), 0), Some(dec!(0.8)));
        assert_eq!(m.probability(dec!(5), 0), Some(dec!(0.2)));
        assert_eq!(m.probability(dec!(5.25), 0), Some(Decimal::ZERO));
    }

    #[test]
    fn test_step_probability_clamped() {
        // forward 6.00 is four steps away; p clamps to 1 so all mass moves up.
        let meeting = d(2025, 11, 27);
        let out = run_binomial(&quotes(dec!(6)), &[meeting], dec!(5), valuation(), &Default::default())
            .unwrap();
        assert_eq!(out.forward_rates[0].step_probability, Some(Decimal::ONE));
        assert_eq!(out.matrix.probability(dec!(5.25), 0), Some(Decimal::ONE));
        assert_eq!(out.matrix.probability(dec!(5), 0), Some(Decimal::ZERO));
    }

    #[test]
    fn test_trials_grow_with_meeting_index() {
        let meetings = [d(2025, 9, 29), d(2025, 11, 27)];
        let out = run_binomial(&quotes(dec!(5.10)), &meetings, dec!(5), valuation(), &Default::default())
            .unwrap();
        assert_eq!(out.forward_rates[0].trials, 1);
        assert_eq!(out.forward_rates[1].trials, 2);
        // second column has mass on three levels: 5.00, 5.25, 5.50
        let non_zero = out.matrix.column(1).iter().filter(|p| !p.is_zero()).count();
        assert_eq!(non_zero, 3);
        assert_close(out.matrix.column_sum(1), Decimal::ONE, dec!(0.0000000001), "column 1");
    }

    #[test]
    fn test_past_meeting_yields_zero_column() {
        let meetings = [d(2025, 7, 29), d(2025, 11, 27)];
        let m = binomial_distribution(&quotes(dec!(5.10)), &meetings, dec!(5), valuation(), &Default::default())
            .unwrap();
        assert!(m.is_column_empty(0));
        assert!(!m.is_column_empty(1));
        assert_eq!(m.skipped.len(), 1);
        assert_eq!(m.skipped[0].reason, SkipReason::MeetingPassed);
    }

    #[test]
    fn test_meeting_on_valuation_date_skipped() {
        let m = binomial_distribution(&quotes(dec!(5.10)), &[valuation()], dec!(5), valuation(), &Default::default())
            .unwrap();
        assert!(m.is_column_empty(0));
    }

    #[test]
    fn test_rounded_cells_two_decimals() {
        let meetings = [d(2025, 9, 29), d(2025, 11, 27), d(2026, 1, 27)];
        let m = binomial_distribution(&quotes(dec!(5.07)), &meetings, dec!(5), valuation(), &Default::default())
            .unwrap();
        for row in &m.probabilities {
            for p in row {
                assert_eq!(*p, p.round_dp(2));
            }
        }
    }

    #[test]
    fn test_too_many_meetings_rejected() {
        let meetings: Vec<NaiveDate> = (0..65).map(|i| d(2026, 1, 1) + chrono::Duration::days(i)).collect();
        let err = binomial_distribution(&[], &meetings, dec!(5), valuation(), &Default::default())
            .unwrap_err();
        assert!(matches!(err, TpmOddsError::Validation { .. }));
    }

    #[test]
    fn test_gap_beyond_representable_steps_saturates() {
        let cfg = DistributionConfig::with_step(dec!(0.0000000000000000000000000001));
        let out = run_binomial(
            &[SwapQuote::days(90, dec!(15))],
            &[d(2025, 11, 27)],
            dec!(5),
            valuation(),
            &cfg,
        )
        .unwrap();
        assert_eq!(out.forward_rates[0].direction, Some(MoveDirection::Up));
        assert_eq!(out.forward_rates[0].step_probability, Some(Decimal::ONE));
        assert_eq!(out.matrix.column_sum(0), Decimal::ONE);
        assert_eq!(out.matrix.probability(dec!(5), 0), Some(Decimal::ZERO));
    }

    #[test]
    fn test_span_over_tiny_step_rejected() {
        let mut cfg = DistributionConfig::with_step(dec!(0.0000000000000000000000000001));
        cfg.span = Some(dec!(1));
        let err = binomial_distribution(&quotes(dec!(5.07)), &[d(2025, 11, 27)], dec!(5), valuation(), &cfg)
            .unwrap_err();
        assert!(matches!(err, TpmOddsError::Validation { ref field, .. } if field == "config.span"));
    }

    #[test]
    fn test_empty_meetings_single_level() {
        let m = binomial_distribution(&[], &[], dec!(5), valuation(), &Default::default()).unwrap();
        assert_eq!(m.levels, vec![dec!(5)]);
        assert!(m.meetings.is_empty());
    }
}
