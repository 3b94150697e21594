//! Swap tenors and their resolution to day-count horizons.
//!
//! The central bank labels its average chamber swap series with tokens such
//! as `D090`, `M06` or `AN01`, wrapped as `SPC-AN01-CLP` once a series has
//! been relabelled. Tenors may also arrive as plain day counts (`90`) or in
//! market shorthand (`90D`, `3M`, `1Y`). Months count as 30 days and years as
//! 360 days, consistent with the act/360 money-market basis used throughout.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TpmOddsError;
use crate::types::Days;
use crate::TpmOddsResult;

const DAYS_PER_WEEK: Days = 7;
const DAYS_PER_MONTH: Days = 30;
const DAYS_PER_YEAR: Days = 360;

/// Label prefix given to average chamber swap series.
pub const SERIES_LABEL_PREFIX: &str = "SPC-";

/// Currency suffixes given to average chamber swap series.
pub const SERIES_CURRENCY_SUFFIXES: [&str; 2] = ["-CLP", "-UF"];

/// Maturity of a swap quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tenor {
    /// Explicit horizon in days.
    Days(Days),
    /// Calendar tenor label, e.g. `"90D"`, `"AN01"`, `"SPC-M06-CLP"`.
    Label(String),
}

impl Tenor {
    /// Resolve the tenor to a horizon in days. Must be strictly positive.
    pub fn days(&self) -> TpmOddsResult<Days> {
        let days = match self {
            Tenor::Days(d) => *d,
            Tenor::Label(label) => parse_tenor_label(label)?,
        };
        if days <= 0 {
            return Err(TpmOddsError::validation(
                "tenor",
                format!("tenor '{self}' must resolve to a positive number of days"),
            ));
        }
        Ok(days)
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tenor::Days(d) => write!(f, "{d}"),
            Tenor::Label(label) => f.write_str(label),
        }
    }
}

impl From<Days> for Tenor {
    fn from(days: Days) -> Self {
        Tenor::Days(days)
    }
}

impl From<&str> for Tenor {
    fn from(label: &str) -> Self {
        Tenor::Label(label.to_string())
    }
}

/// Strip the `SPC-` prefix and currency suffix from a series label.
pub fn strip_series_label(label: &str) -> &str {
    let mut token = label.trim();
    if let Some(rest) = token.strip_prefix(SERIES_LABEL_PREFIX) {
        token = rest;
    }
    for suffix in SERIES_CURRENCY_SUFFIXES {
        if let Some(rest) = token.strip_suffix(suffix) {
            token = rest;
            break;
        }
    }
    token
}

/// Parse a tenor label into days.
///
/// Accepts unit-first (`D090`, `M03`, `AN01`, `Y02`) and count-first
/// (`90D`, `2W`, `3M`, `1Y`) forms, bare integers, and either form wrapped
/// in a series label (`SPC-AN01-UF`).
pub fn parse_tenor_label(label: &str) -> TpmOddsResult<Days> {
    let token = strip_series_label(label).to_ascii_uppercase();
    let invalid = || {
        TpmOddsError::validation(
            "tenor",
            format!("unrecognised tenor label '{label}'"),
        )
    };

    if token.is_empty() {
        return Err(invalid());
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse::<Days>().map_err(|_| invalid());
    }

    let (unit, count) = if token.starts_with(|c: char| c.is_ascii_alphabetic()) {
        let split = token
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (unit, count) = token.split_at(split);
        (unit.to_string(), count.to_string())
    } else {
        let split = token
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (count, unit) = token.split_at(split);
        (unit.to_string(), count.to_string())
    };

    if !count.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let n: Days = count.parse().map_err(|_| invalid())?;

    let multiplier = match unit.as_str() {
        "D" => 1,
        "W" => DAYS_PER_WEEK,
        "M" => DAYS_PER_MONTH,
        "Y" | "A" | "AN" => DAYS_PER_YEAR,
        _ => return Err(invalid()),
    };

    n.checked_mul(multiplier).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_days() {
        assert_eq!(Tenor::Days(90).days().unwrap(), 90);
        assert_eq!(parse_tenor_label("180").unwrap(), 180);
    }

    #[test]
    fn test_count_first_labels() {
        assert_eq!(parse_tenor_label("90D").unwrap(), 90);
        assert_eq!(parse_tenor_label("2w").unwrap(), 14);
        assert_eq!(parse_tenor_label("3M").unwrap(), 90);
        assert_eq!(parse_tenor_label("1Y").unwrap(), 360);
    }

    #[test]
    fn test_unit_first_labels() {
        assert_eq!(parse_tenor_label("D090").unwrap(), 90);
        assert_eq!(parse_tenor_label("M06").unwrap(), 180);
        assert_eq!(parse_tenor_label("AN01").unwrap(), 360);
        assert_eq!(parse_tenor_label("Y02").unwrap(), 720);
    }

    #[test]
    fn test_series_labels() {
        assert_eq!(parse_tenor_label("SPC-D180-CLP").unwrap(), 180);
        assert_eq!(parse_tenor_label("SPC-AN02-UF").unwrap(), 720);
        assert_eq!(strip_series_label("SPC-M03-CLP"), "M03");
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let err = parse_tenor_label("3Q").unwrap_err();
        assert!(matches!(err, TpmOddsError::Validation { .. }));
    }

    #[test]
    fn test_malformed_labels_rejected() {
        assert!(parse_tenor_label("").is_err());
        assert!(parse_tenor_label("SPC--CLP").is_err());
        assert!(parse_tenor_label("D").is_err());
        assert!(parse_tenor_label("D09X").is_err());
    }

    #[test]
    fn test_zero_tenor_rejected() {
        assert!(Tenor::Days(0).days().is_err());
        assert!(Tenor::from("D000").days().is_err());
        assert!(Tenor::Days(-30).days().is_err());
    }

    #[test]
    fn test_tenor_deserialises_from_int_or_string() {
        let t: Tenor = serde_json::from_str("90").unwrap();
        assert_eq!(t, Tenor::Days(90));
        let t: Tenor = serde_json::from_str("\"AN01\"").unwrap();
        assert_eq!(t, Tenor::Label("AN01".into()));
    }
}
