use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TpmOddsError;
use crate::TpmOddsResult;

/// Annualised rates. Percentage points (4.75) or fractions (0.0475),
/// depending on the [`RateUnit`] the caller works in.
pub type Rate = Decimal;

/// Probability mass in [0, 1].
pub type Probability = Decimal;

/// Horizon measured in calendar days from the valuation date (act/360 basis).
pub type Days = i64;

/// Day-count denominator used for every year fraction.
pub const DAY_COUNT_BASIS: Decimal = dec!(360);

/// Unit in which rates, the policy rate and the grid step are quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateUnit {
    /// Percentage points, as published by the central bank (4.75 = 4.75%).
    #[default]
    Percent,
    /// Decimal fractions (0.0475 = 4.75%).
    Fraction,
}

impl RateUnit {
    /// Divisor that turns a rate in this unit into a decimal fraction.
    pub fn scale(self) -> Decimal {
        match self {
            RateUnit::Percent => Decimal::ONE_HUNDRED,
            RateUnit::Fraction => Decimal::ONE,
        }
    }
}

/// Parse a `YYYY-MM-DD` (ISO) or `DD-MM-YYYY` (central bank) date string.
pub fn parse_date(raw: &str) -> TpmOddsResult<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d-%m-%Y"))
        .map_err(|_| TpmOddsError::DateError(format!("unrecognised date '{raw}'")))
}

/// Signed number of days from `valuation_date` to `date`.
pub fn days_between(valuation_date: NaiveDate, date: NaiveDate) -> Days {
    (date - valuation_date).num_days()
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let d = parse_date("2025-09-09").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 9, 9).unwrap());
    }

    #[test]
    fn test_parse_central_bank_date() {
        let d = parse_date("28-08-2025").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 8, 28).unwrap());
    }

    #[test]
    fn test_parse_garbage_date_rejected() {
        assert!(matches!(
            parse_date("next tuesday"),
            Err(TpmOddsError::DateError(_))
        ));
    }

    #[test]
    fn test_days_between_signed() {
        let a = NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 9, 9).unwrap();
        assert_eq!(days_between(a, b), 11);
        assert_eq!(days_between(b, a), -11);
    }

    #[test]
    fn test_day_count_basis_is_360() {
        assert_eq!(DAY_COUNT_BASIS, Decimal::from(360));
    }
}
