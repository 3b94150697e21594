use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::{extract_grid, format_value, Grid};

/// Print just the key answer: the most likely rate per meeting for a
/// distribution, otherwise the first well-known result field.
pub fn print_minimal(value: &Value) {
    if let Some(grid) = extract_grid(value) {
        if grid.headers.first().map(String::as_str) == Some("rate") {
            print_modes(&grid);
            return;
        }
    }

    let result = value.get("result").unwrap_or(value);
    let priority_keys = ["forward_rate", "quotes", "points"];

    if let Value::Object(map) = result {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", minimal_value(val));
                    return;
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, minimal_value(val));
            return;
        }
    }

    println!("{}", minimal_value(result));
}

/// One `meeting: rate (probability)` line per column, `-` for empty columns.
fn print_modes(grid: &Grid) {
    for (col, meeting) in grid.headers.iter().enumerate().skip(1) {
        let mut best: Option<(&str, Decimal)> = None;
        for row in &grid.rows {
            let p = row
                .get(col)
                .and_then(|c| Decimal::from_str(c).ok())
                .unwrap_or(Decimal::ZERO);
            if p > Decimal::ZERO && best.map_or(true, |(_, bp)| p > bp) {
                best = Some((row[0].as_str(), p));
            }
        }
        match best {
            Some((rate, p)) => println!("{}: {} ({})", meeting, rate, p),
            None => println!("{}: -", meeting),
        }
    }
}

fn minimal_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        other => format_value(other),
    }
}
