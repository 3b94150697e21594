//! Pivoting raw observations into a date × swap-label rate table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::siete::{Observation, SwapCurrency};
use crate::curves::{SwapQuote, Tenor};
use crate::distribution::ImpliedRateObservation;
use crate::error::TpmOddsError;
use crate::types::Rate;
use crate::TpmOddsResult;

/// Observations of one series, tagged with its short label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelledObservations {
    pub label: String,
    pub observations: Vec<Observation>,
}

/// One curve date and the rate of every series observed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRateRow {
    pub date: NaiveDate,
    pub rates: BTreeMap<String, Rate>,
}

/// Swap rates by date (ascending) and label (sorted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRateTable {
    pub labels: Vec<String>,
    pub rows: Vec<SwapRateRow>,
}

/// Pivot observations into a table, averaging repeated (date, label) cells.
///
/// Non-numeric values are dropped; dates and labels with no numeric value at
/// all do not appear in the table.
pub fn pivot_observations(series: &[LabelledObservations]) -> TpmOddsResult<SwapRateTable> {
    let mut cells: BTreeMap<NaiveDate, BTreeMap<String, (Decimal, u32)>> = BTreeMap::new();
    let mut labels: BTreeSet<String> = BTreeSet::new();

    for s in series {
        for obs in &s.observations {
            let date = obs.date()?;
            let Some(rate) = obs.rate() else {
                continue;
            };
            let cell = cells
                .entry(date)
                .or_default()
                .entry(s.label.clone())
                .or_insert((Decimal::ZERO, 0));
            cell.0 += rate;
            cell.1 += 1;
            labels.insert(s.label.clone());
        }
    }

    let rows: Vec<SwapRateRow> = cells
        .into_iter()
        .map(|(date, by_label)| SwapRateRow {
            date,
            rates: by_label
                .into_iter()
                .map(|(label, (sum, count))| (label, sum / Decimal::from(count)))
                .collect(),
        })
        .collect();

    tracing::debug!(rows = rows.len(), labels = labels.len(), "pivoted swap observations");

    Ok(SwapRateTable {
        labels: labels.into_iter().collect(),
        rows,
    })
}

impl SwapRateTable {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn row(&self, date: NaiveDate) -> Option<&SwapRateRow> {
        self.rows.iter().find(|r| r.date == date)
    }

    pub fn rate(&self, date: NaiveDate, label: &str) -> Option<Rate> {
        self.row(date)?.rates.get(label).copied()
    }

    /// Quotes for one curve date and currency, sorted by tenor.
    pub fn quotes_on(&self, date: NaiveDate, currency: SwapCurrency) -> TpmOddsResult<Vec<SwapQuote>> {
        let row = self.row(date).ok_or_else(|| {
            TpmOddsError::InsufficientData(format!("no swap rates observed on {date}"))
        })?;

        let mut quotes = Vec::new();
        for (label, rate) in &row.rates {
            if SwapCurrency::of_label(label) != Some(currency) {
                continue;
            }
            let tenor = Tenor::Label(label.clone());
            let days = tenor.days()?;
            quotes.push((days, SwapQuote::new(tenor, *rate)));
        }

        if quotes.is_empty() {
            return Err(TpmOddsError::InsufficientData(format!(
                "no {currency} swap rates observed on {date}"
            )));
        }

        quotes.sort_by_key(|(days, _)| *days);
        Ok(quotes.into_iter().map(|(_, q)| q).collect())
    }

    /// Dated observations of one label, for the heuristic model.
    pub fn series(&self, label: &str) -> Vec<ImpliedRateObservation> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.rates.get(label).map(|rate| ImpliedRateObservation {
                    date: row.date,
                    rate: *rate,
                })
            })
            .collect()
    }
}
