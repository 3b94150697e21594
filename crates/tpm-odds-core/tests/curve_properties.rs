use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use tpm_odds_core::curves::{build_spot_curve, forward_rate, interpolate_spot, SwapQuote};
use tpm_odds_core::distribution::{binomial_distribution_unrounded, DistributionConfig};

// Rates in percent with two decimals, between 0.50 and 15.00
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (50i64..1500i64).prop_map(|bp| Decimal::new(bp, 2))
}

// Up to eight quotes with distinct tenors between 1 day and 10 years
fn quotes_strategy() -> impl Strategy<Value = Vec<SwapQuote>> {
    prop::collection::btree_map(1i64..3600i64, rate_strategy(), 0..8).prop_map(
        |m: BTreeMap<i64, Decimal>| {
            m.into_iter()
                .map(|(days, rate)| SwapQuote::days(days, rate))
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_interpolation_stays_within_curve_bounds(
        quotes in quotes_strategy(),
        tpm in rate_strategy(),
        horizon in -30i64..4000i64,
    ) {
        let curve = build_spot_curve(&quotes, tpm).unwrap();
        let lo = curve.points().iter().map(|p| p.rate).min().unwrap();
        let hi = curve.points().iter().map(|p| p.rate).max().unwrap();
        let r = interpolate_spot(&curve, horizon);
        prop_assert!(r >= lo && r <= hi, "{} outside [{}, {}]", r, lo, hi);
    }

    #[test]
    fn test_extrapolation_is_flat(
        quotes in quotes_strategy(),
        tpm in rate_strategy(),
        beyond in 1i64..5000i64,
    ) {
        let curve = build_spot_curve(&quotes, tpm).unwrap();
        let last = curve.points().last().unwrap();
        prop_assert_eq!(interpolate_spot(&curve, last.days + beyond), last.rate);
        prop_assert_eq!(interpolate_spot(&curve, -beyond), tpm);
    }

    #[test]
    fn test_curve_passes_through_its_nodes(
        quotes in quotes_strategy(),
        tpm in rate_strategy(),
    ) {
        let curve = build_spot_curve(&quotes, tpm).unwrap();
        prop_assert_eq!(curve.len(), quotes.len() + 1);
        for p in curve.points() {
            prop_assert_eq!(interpolate_spot(&curve, p.days), p.rate);
        }
    }

    #[test]
    fn test_forward_from_day_zero_equals_spot(
        quotes in quotes_strategy(),
        tpm in rate_strategy(),
        horizon in 1i64..4000i64,
    ) {
        let curve = build_spot_curve(&quotes, tpm).unwrap();
        let spot = interpolate_spot(&curve, horizon);
        let fwd = forward_rate(&curve, 0, horizon).unwrap().unwrap();
        prop_assert!((fwd - spot).abs() <= Decimal::new(1, 4), "forward {} vs spot {}", fwd, spot);
    }

    #[test]
    fn test_binomial_columns_are_distributions(
        quotes in quotes_strategy(),
        tpm in rate_strategy(),
        gaps in prop::collection::vec(1i64..120i64, 1..6),
    ) {
        let valuation = chrono::NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        let mut offset = 0;
        let meetings: Vec<_> = gaps
            .iter()
            .map(|g| {
                offset += g;
                valuation + chrono::Duration::days(offset)
            })
            .collect();
        let m = binomial_distribution_unrounded(
            &quotes,
            &meetings,
            tpm,
            valuation,
            &DistributionConfig::default(),
        )
        .unwrap();
        for col in 0..meetings.len() {
            let sum = m.column_sum(col);
            prop_assert!((sum - Decimal::ONE).abs() < Decimal::new(1, 7), "column {} sums to {}", col, sum);
            prop_assert!(m.column(col).iter().all(|p| *p >= Decimal::ZERO));
        }
    }
}
