pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// A header row plus body rows, already rendered to strings.
pub struct Grid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Probability matrix (rate rows × meeting columns) or swap rate table
/// (date rows × label columns) found in a result envelope.
pub fn extract_grid(value: &Value) -> Option<Grid> {
    let result = value.get("result").unwrap_or(value);
    let matrix = result.get("matrix").unwrap_or(result);
    matrix_grid(matrix).or_else(|| swap_table_grid(result))
}

fn matrix_grid(matrix: &Value) -> Option<Grid> {
    let levels = matrix.get("levels")?.as_array()?;
    let meetings = matrix.get("meetings")?.as_array()?;
    let probabilities = matrix.get("probabilities")?.as_array()?;

    let mut headers = vec!["rate".to_string()];
    headers.extend(meetings.iter().map(format_value));

    let rows = levels
        .iter()
        .zip(probabilities)
        .map(|(level, row)| {
            let mut cells = vec![format_value(level)];
            if let Value::Array(ps) = row {
                cells.extend(ps.iter().map(format_value));
            }
            cells
        })
        .collect();

    Some(Grid { headers, rows })
}

fn swap_table_grid(table: &Value) -> Option<Grid> {
    let labels = table.get("labels")?.as_array()?;
    let rows = table.get("rows")?.as_array()?;
    let labels: Vec<String> = labels.iter().map(format_value).collect();

    let mut headers = vec!["date".to_string()];
    headers.extend(labels.iter().cloned());

    let empty = Map::new();
    let rows = rows
        .iter()
        .map(|row| {
            let rates = row
                .get("rates")
                .and_then(Value::as_object)
                .unwrap_or(&empty);
            let mut cells = vec![row.get("date").map(format_value).unwrap_or_default()];
            cells.extend(
                labels
                    .iter()
                    .map(|l| rates.get(l).map(format_value).unwrap_or_default()),
            );
            cells
        })
        .collect();

    Some(Grid { headers, rows })
}

/// Render a scalar for display; nested values fall back to JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
