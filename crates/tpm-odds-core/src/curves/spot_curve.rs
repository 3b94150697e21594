//! Spot curve construction from swap quotes.
//!
//! The curve is anchored at horizon 0 with the current policy rate (TPM) and
//! carries one point per swap tenor. It is rebuilt on every call and never
//! mutated afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tenor::Tenor;
use crate::error::TpmOddsError;
use crate::types::{Days, Rate, RateUnit};
use crate::TpmOddsResult;

/// A swap rate observed for one tenor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Maturity in days or as a tenor label
    pub tenor: Tenor,
    /// Annualised swap rate
    pub rate: Rate,
}

impl SwapQuote {
    pub fn new(tenor: Tenor, rate: Rate) -> Self {
        SwapQuote { tenor, rate }
    }

    /// Quote for an explicit horizon in days.
    pub fn days(days: Days, rate: Rate) -> Self {
        SwapQuote::new(Tenor::Days(days), rate)
    }

    /// Quote for a tenor label such as `"AN01"` or `"SPC-D090-CLP"`.
    pub fn labelled(label: &str, rate: Rate) -> Self {
        SwapQuote::new(Tenor::Label(label.to_string()), rate)
    }
}

/// A point on the spot curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotPoint {
    pub days: Days,
    pub rate: Rate,
}

/// Spot rates indexed by horizon in days, sorted ascending, anchored at day 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotCurve {
    points: Vec<SpotPoint>,
    unit: RateUnit,
}

impl SpotCurve {
    /// Points sorted by ascending horizon. Always non-empty.
    pub fn points(&self) -> &[SpotPoint] {
        &self.points
    }

    pub fn unit(&self) -> RateUnit {
        self.unit
    }

    /// The day-0 anchor, i.e. the policy rate the curve was built from.
    pub fn anchor(&self) -> Rate {
        self.points
            .iter()
            .find(|p| p.days == 0)
            .map(|p| p.rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Number of points including the anchor.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: the anchor is present in every curve.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_days(&self) -> Days {
        self.points.first().map(|p| p.days).unwrap_or(0)
    }

    pub fn max_days(&self) -> Days {
        self.points.last().map(|p| p.days).unwrap_or(0)
    }
}

/// Build a spot curve in percentage points (the central bank's quoting unit).
pub fn build_spot_curve(
    quotes: &[SwapQuote],
    current_policy_rate: Rate,
) -> TpmOddsResult<SpotCurve> {
    build_spot_curve_with_unit(quotes, current_policy_rate, RateUnit::Percent)
}

/// Build a spot curve seeded with `{0: current_policy_rate}` plus one point
/// per quote.
///
/// Tenors must resolve to distinct, strictly positive day counts. Two labels
/// resolving to the same horizon (e.g. `"90"` and `"D090"`) are rejected
/// rather than silently overwritten.
pub fn build_spot_curve_with_unit(
    quotes: &[SwapQuote],
    current_policy_rate: Rate,
    unit: RateUnit,
) -> TpmOddsResult<SpotCurve> {
    let mut points: BTreeMap<Days, Rate> = BTreeMap::new();
    points.insert(0, current_policy_rate);

    for (i, quote) in quotes.iter().enumerate() {
        let days = quote.tenor.days().map_err(|e| match e {
            TpmOddsError::Validation { reason, .. } => TpmOddsError::Validation {
                field: format!("quotes[{i}].tenor"),
                reason,
            },
            other => other,
        })?;
        if points.insert(days, quote.rate).is_some() {
            return Err(TpmOddsError::validation(
                format!("quotes[{i}].tenor"),
                format!("duplicate tenor '{}' ({days} days)", quote.tenor),
            ));
        }
    }

    let points: Vec<SpotPoint> = points
        .into_iter()
        .map(|(days, rate)| SpotPoint { days, rate })
        .collect();

    tracing::debug!(
        points = points.len(),
        anchor = %current_policy_rate,
        max_days = points.last().map(|p| p.days).unwrap_or(0),
        "built spot curve"
    );

    Ok(SpotCurve { points, unit })
}
