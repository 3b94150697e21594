use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{extract_grid, format_value, Grid};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    let result = value.get("result");

    if let Some(Value::Array(forwards)) = result.and_then(|r| r.get("forward_rates")) {
        print_array_table(forwards);
        println!();
    }

    if let Some(grid) = extract_grid(value) {
        print_grid(&grid);
    } else {
        match result.unwrap_or(value) {
            Value::Object(map) => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in map {
                    builder.push_record([key.as_str(), &format_value(val)]);
                }
                println!("{}", Table::from(builder));
            }
            Value::Array(arr) => print_array_table(arr),
            other => println!("{}", other),
        }
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_grid(grid: &Grid) {
    let mut builder = Builder::default();
    builder.push_record(grid.headers.clone());
    for row in &grid.rows {
        builder.push_record(row.clone());
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}
