use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use tpm_odds_core::distribution::DistributionConfig;

use super::file;

/// Fill the `config` object of a model input.
///
/// Precedence, highest first: command-line flags, keys present in the JSON
/// input, the YAML config file.
pub fn apply_config(
    input: &mut Value,
    config_path: Option<&str>,
    step: Option<Decimal>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = as_object(input)?;
    let entry = root
        .entry("config")
        .or_insert_with(|| Value::Object(Map::new()));
    let config = entry
        .as_object_mut()
        .ok_or("'config' must be a JSON object")?;

    if let Some(path) = config_path {
        let defaults: DistributionConfig = file::read_yaml(path)?;
        if let Value::Object(defaults) = serde_json::to_value(defaults)? {
            for (key, value) in defaults {
                config.entry(key).or_insert(value);
            }
        }
        tracing::debug!(path, "applied grid config file");
    }

    if let Some(step) = step {
        config.insert("step".into(), serde_json::to_value(step)?);
    }
    Ok(())
}

/// Set `valuation_date`: the flag wins, then the input, then today's date.
pub fn apply_valuation_date(
    input: &mut Value,
    flag: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = as_object(input)?;
    match flag {
        Some(date) => {
            root.insert("valuation_date".into(), Value::String(date.to_string()));
        }
        None => {
            root.entry("valuation_date").or_insert_with(|| {
                let today = chrono::Local::now().date_naive();
                tracing::info!(%today, "valuation date defaulted to today");
                Value::String(today.to_string())
            });
        }
    }
    Ok(())
}

fn as_object(input: &mut Value) -> Result<&mut Map<String, Value>, Box<dyn std::error::Error>> {
    input
        .as_object_mut()
        .ok_or_else(|| "input must be a JSON object".into())
}
