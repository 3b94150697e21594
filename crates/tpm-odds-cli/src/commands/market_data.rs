use chrono::NaiveDate;
use clap::Args;
use serde_json::{json, Value};

use tpm_odds_core::market_data::{
    pivot_observations, swap_series_catalogue, LabelledObservations, SeriesObservationsResponse,
    SeriesSearchResponse, SwapCurrency,
};

use crate::input::file;

#[derive(Args)]
pub struct SwapTableArgs {
    /// Saved `SearchSeries` response body
    #[arg(long)]
    pub series: String,

    /// Saved JSON array of `GetSeries` response bodies
    #[arg(long)]
    pub observations: String,

    /// Print the quotes of one curve date instead of the full table
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Swap currency for `--date` (CLP or UF)
    #[arg(long)]
    pub currency: Option<SwapCurrency>,
}

pub fn run_swap_table(args: SwapTableArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let search: SeriesSearchResponse = file::read_json(&args.series)?;
    let catalogue = swap_series_catalogue(&search.into_series()?)?;

    let responses: Vec<SeriesObservationsResponse> = file::read_json(&args.observations)?;
    let mut series = Vec::with_capacity(responses.len());
    for response in responses {
        let id = response.series.series_id.clone().unwrap_or_default();
        let Some(entry) = catalogue.iter().find(|s| s.id == id) else {
            tracing::warn!(%id, "skipping series outside the swap catalogue");
            continue;
        };
        series.push(LabelledObservations {
            label: entry.label.clone(),
            observations: response.into_observations()?,
        });
    }

    let table = pivot_observations(&series)?;

    if args.date.is_none() && args.currency.is_none() {
        return Ok(json!({ "result": serde_json::to_value(&table)? }));
    }

    let date = match args.date.or_else(|| table.latest_date()) {
        Some(d) => d,
        None => return Err("no observations to select a curve date from".into()),
    };
    let currency = args.currency.unwrap_or(SwapCurrency::Clp);
    let quotes = table.quotes_on(date, currency)?;
    Ok(json!({
        "result": {
            "date": date.to_string(),
            "currency": currency.to_string(),
            "quotes": serde_json::to_value(&quotes)?,
        }
    }))
}
