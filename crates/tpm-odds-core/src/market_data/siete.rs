//! Payloads of the central bank's SieteRestWS time-series service.
//!
//! Only the JSON shapes are modelled here. Fetching (and the credentials the
//! service requires) is left to the caller; these types take the response
//! bodies as already-downloaded strings or values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TpmOddsError;
use crate::types::{parse_date, Rate};
use crate::TpmOddsResult;

/// Title fragments identifying average chamber swap series.
pub const SWAP_TITLE_PATTERNS: [&str; 2] = ["Swap promedio camara", "Swap promedio de camara"];

/// Series-id fragments rewritten into the short swap label, applied in order.
const LABEL_REWRITES: [(&str, &str); 4] = [
    ("F022.SPC.TIN.", "SPC-"),
    (".UF.Z.D", "-UF"),
    (".NO.Z.D", "-CLP"),
    ("F022.SPC.TPR.", "SPC-"),
];

/// Catalogue entry returned by the `SearchSeries` function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
    pub series_id: String,
    #[serde(default)]
    pub frequency_code: Option<String>,
    pub spanish_title: String,
    #[serde(default)]
    pub english_title: Option<String>,
    #[serde(default)]
    pub first_observation: Option<String>,
    #[serde(default)]
    pub last_observation: Option<String>,
}

/// Body of a `SearchSeries` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSearchResponse {
    #[serde(rename = "Codigo", default)]
    pub code: i64,
    #[serde(rename = "Descripcion", default)]
    pub description: String,
    #[serde(rename = "SeriesInfos", default)]
    pub series_infos: Option<Vec<SeriesInfo>>,
}

impl SeriesSearchResponse {
    /// The catalogue entries, or an error when the service reported one.
    pub fn into_series(self) -> TpmOddsResult<Vec<SeriesInfo>> {
        check_code(self.code, &self.description)?;
        self.series_infos.ok_or_else(|| {
            TpmOddsError::Upstream("SeriesInfos key not found or is not a list".into())
        })
    }
}

/// One raw observation as published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// `DD-MM-YYYY`
    #[serde(rename = "indexDateString")]
    pub index_date: String,
    pub value: String,
    #[serde(rename = "statusCode", default)]
    pub status_code: Option<String>,
}

impl Observation {
    pub fn date(&self) -> TpmOddsResult<NaiveDate> {
        parse_date(&self.index_date)
    }

    /// Numeric value, or `None` for gaps such as `"NaN"` or `""`.
    pub fn rate(&self) -> Option<Rate> {
        Decimal::from_str(self.value.trim()).ok()
    }
}

/// The `Series` object of a `GetSeries` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPayload {
    #[serde(rename = "seriesId", default)]
    pub series_id: Option<String>,
    #[serde(rename = "descripEsp", default)]
    pub spanish_description: Option<String>,
    #[serde(rename = "Obs", default)]
    pub observations: Vec<Observation>,
}

/// Body of a `GetSeries` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesObservationsResponse {
    #[serde(rename = "Codigo", default)]
    pub code: i64,
    #[serde(rename = "Descripcion", default)]
    pub description: String,
    #[serde(rename = "Series")]
    pub series: SeriesPayload,
}

impl SeriesObservationsResponse {
    pub fn into_observations(self) -> TpmOddsResult<Vec<Observation>> {
        check_code(self.code, &self.description)?;
        Ok(self.series.observations)
    }
}

fn check_code(code: i64, description: &str) -> TpmOddsResult<()> {
    if code != 0 {
        return Err(TpmOddsError::Upstream(format!(
            "service returned code {code}: {description}"
        )));
    }
    Ok(())
}

/// Settlement currency of a swap series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwapCurrency {
    /// Nominal pesos
    Clp,
    /// Inflation-indexed unidad de fomento
    Uf,
}

impl SwapCurrency {
    pub fn label_suffix(self) -> &'static str {
        match self {
            SwapCurrency::Clp => "-CLP",
            SwapCurrency::Uf => "-UF",
        }
    }

    pub fn of_label(label: &str) -> Option<SwapCurrency> {
        [SwapCurrency::Clp, SwapCurrency::Uf]
            .into_iter()
            .find(|c| label.ends_with(c.label_suffix()))
    }
}

impl fmt::Display for SwapCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapCurrency::Clp => f.write_str("CLP"),
            SwapCurrency::Uf => f.write_str("UF"),
        }
    }
}

impl FromStr for SwapCurrency {
    type Err = TpmOddsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLP" => Ok(SwapCurrency::Clp),
            "UF" => Ok(SwapCurrency::Uf),
            other => Err(TpmOddsError::validation(
                "currency",
                format!("unknown swap currency '{other}'"),
            )),
        }
    }
}

/// A swap series selected from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSeries {
    pub id: String,
    /// Short label, e.g. `SPC-AN01-CLP`
    pub label: String,
    pub description: String,
}

impl SwapSeries {
    pub fn currency(&self) -> Option<SwapCurrency> {
        SwapCurrency::of_label(&self.label)
    }
}

/// Short label for a series id (`F022.SPC.TIN.AN01.NO.Z.D` -> `SPC-AN01-CLP`).
pub fn series_label(series_id: &str) -> String {
    LABEL_REWRITES
        .iter()
        .fold(series_id.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Keep the average chamber swap series, in catalogue order per title pattern.
pub fn swap_series_catalogue(infos: &[SeriesInfo]) -> TpmOddsResult<Vec<SwapSeries>> {
    let mut selected = Vec::new();
    for pattern in SWAP_TITLE_PATTERNS {
        for info in infos {
            if info.spanish_title.contains(pattern) {
                selected.push(SwapSeries {
                    id: info.series_id.clone(),
                    label: series_label(&info.series_id),
                    description: info.spanish_title.clone(),
                });
            }
        }
    }

    if selected.is_empty() {
        return Err(TpmOddsError::InsufficientData(
            "no average chamber swap series in the catalogue".into(),
        ));
    }
    tracing::debug!(series = selected.len(), "selected swap series");
    Ok(selected)
}
