//! Spot interpolation and simple forward rates on an act/360 basis.

use rust_decimal::Decimal;

use super::spot_curve::SpotCurve;
use crate::error::TpmOddsError;
use crate::types::{Days, Rate, DAY_COUNT_BASIS};
use crate::TpmOddsResult;

/// Decimal places kept on forward rates.
pub const FORWARD_RATE_DP: u32 = 4;

/// Linearly interpolate the spot rate at `horizon_days`.
///
/// Outside the covered range the nearest boundary rate is returned (flat
/// extrapolation).
pub fn interpolate_spot(curve: &SpotCurve, horizon_days: Days) -> Rate {
    let points = curve.points();
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Decimal::ZERO,
    };

    if horizon_days <= first.days {
        return first.rate;
    }
    if horizon_days >= last.days {
        return last.rate;
    }

    for w in points.windows(2) {
        if horizon_days >= w[0].days && horizon_days <= w[1].days {
            let dt = w[1].days - w[0].days;
            if dt == 0 {
                return w[0].rate;
            }
            let frac = Decimal::from(horizon_days - w[0].days) / Decimal::from(dt);
            return w[0].rate + frac * (w[1].rate - w[0].rate);
        }
    }

    last.rate
}

/// Annualised simple forward rate between two horizons.
///
/// `f = ((1 + r2·t2) / (1 + r1·t1) − 1) · 360 / (end − start)` with
/// `t = days / 360` and `t1 = 0` when `start_days <= 0`. Rates are converted
/// to fractions for the compounding step and returned in the curve's unit,
/// rounded to 4 decimal places.
///
/// Returns `Err(ContractViolation)` when `end_days == start_days` (callers must
/// filter same-day horizons) and `Ok(None)` when the forward is undefined:
/// `end_days < start_days`, or a vanishing start discount factor.
pub fn forward_rate(
    curve: &SpotCurve,
    start_days: Days,
    end_days: Days,
) -> TpmOddsResult<Option<Rate>> {
    if end_days == start_days {
        return Err(TpmOddsError::ContractViolation {
            context: format!(
                "forward_rate: start and end horizons coincide at {start_days} days"
            ),
        });
    }
    if end_days < start_days {
        return Ok(None);
    }

    let scale = curve.unit().scale();
    let r1 = interpolate_spot(curve, start_days) / scale;
    let r2 = interpolate_spot(curve, end_days) / scale;

    let t1 = Decimal::from(start_days.max(0)) / DAY_COUNT_BASIS;
    let t2 = Decimal::from(end_days.max(0)) / DAY_COUNT_BASIS;

    let start_growth = Decimal::ONE + r1 * t1;
    if start_growth <= Decimal::ZERO {
        return Ok(None);
    }

    let ratio = (Decimal::ONE + r2 * t2) / start_growth - Decimal::ONE;
    let annualised = ratio * DAY_COUNT_BASIS / Decimal::from(end_days - start_days);

    Ok(Some((annualised * scale).round_dp(FORWARD_RATE_DP)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::spot_curve::{build_spot_curve, build_spot_curve_with_unit, SwapQuote};
    use crate::types::RateUnit;
    use rust_decimal_macros::dec;

    fn two_point_curve(unit: RateUnit) -> SpotCurve {
        build_spot_curve_with_unit(&[SwapQuote::days(90, dec!(0.047))], dec!(0.045), unit)
            .unwrap()
    }

    #[test]
    fn test_interpolate_at_nodes() {
        let curve = two_point_curve(RateUnit::Fraction);
        assert_eq!(interpolate_spot(&curve, 0), dec!(0.045));
        assert_eq!(interpolate_spot(&curve, 90), dec!(0.047));
    }

    #[test]
    fn test_interpolate_midpoint() {
        let curve = two_point_curve(RateUnit::Fraction);
        assert_eq!(interpolate_spot(&curve, 45), dec!(0.046));
    }

    #[test]
    fn test_flat_extrapolation_right() {
        let curve = two_point_curve(RateUnit::Fraction);
        assert_eq!(interpolate_spot(&curve, 200), dec!(0.047));
    }

    #[test]
    fn test_flat_extrapolation_left() {
        let curve = two_point_curve(RateUnit::Fraction);
        assert_eq!(interpolate_spot(&curve, -30), dec!(0.045));
    }

    #[test]
    fn test_anchor_only_curve_is_flat() {
        let curve = build_spot_curve(&[], dec!(4.75)).unwrap();
        for d in [-10, 0, 1, 45, 720] {
            assert_eq!(interpolate_spot(&curve, d), dec!(4.75));
        }
    }

    #[test]
    fn test_forward_from_day_zero_worked_example() {
        // r1 = 0.045, r2 = 0.047, t1 = 0, t2 = 0.25
        // ratio = 0.01175, annualised = 0.01175 * 360 / 90 = 0.047
        let curve = two_point_curve(RateUnit::Fraction);
        assert_eq!(forward_rate(&curve, 0, 90).unwrap(), Some(dec!(0.0470)));
    }

    #[test]
    fn test_forward_from_day_zero_unit_invariant() {
        let curve = two_point_curve(RateUnit::Percent);
        assert_eq!(forward_rate(&curve, 0, 90).unwrap(), Some(dec!(0.0470)));
    }

    #[test]
    fn test_forward_between_two_swap_points_percent() {
        let quotes = vec![
            SwapQuote::days(90, dec!(5.00)),
            SwapQuote::days(180, dec!(5.20)),
        ];
        let curve = build_spot_curve(&quotes, dec!(5.00)).unwrap();
        // (1 + 0.052 * 0.5) / (1 + 0.05 * 0.25) - 1 = 1.026 / 1.0125 - 1
        // = 0.0133333..., annualised over 90 days = 0.0533333... -> 5.3333%
        assert_eq!(forward_rate(&curve, 90, 180).unwrap(), Some(dec!(5.3333)));
    }

    #[test]
    fn test_forward_same_day_is_contract_violation() {
        let curve = two_point_curve(RateUnit::Fraction);
        let err = forward_rate(&curve, 30, 30).unwrap_err();
        assert!(matches!(err, TpmOddsError::ContractViolation { .. }));
    }

    #[test]
    fn test_forward_reversed_horizons_undefined() {
        let curve = two_point_curve(RateUnit::Fraction);
        assert_eq!(forward_rate(&curve, 90, 30).unwrap(), None);
    }

    #[test]
    fn test_forward_on_flat_curve_equals_spot() {
        let curve = build_spot_curve(&[], dec!(4.75)).unwrap();
        assert_eq!(forward_rate(&curve, 0, 60).unwrap(), Some(dec!(4.75)));
    }
}
