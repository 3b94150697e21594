use serde_json::Value;
use std::io;

use super::{extract_grid, format_value};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(grid) = extract_grid(value) {
        let _ = wtr.write_record(&grid.headers);
        for row in &grid.rows {
            let _ = wtr.write_record(row);
        }
    } else {
        match value.get("result").unwrap_or(value) {
            Value::Object(map) => {
                if let Some(Value::Array(items)) = map.get("quotes") {
                    write_array_csv(&mut wtr, items);
                } else {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in map {
                        let _ = wtr.write_record([key.as_str(), &format_value(val)]);
                    }
                }
            }
            Value::Array(arr) => write_array_csv(&mut wtr, arr),
            other => {
                let _ = wtr.write_record([&format_value(other)]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(format_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
