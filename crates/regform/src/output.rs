//! Output formatting helpers for the `regform` CLI.

use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a simple table with headers and rows.
///
/// Column widths are computed from the data for alignment. Cells may carry
/// ANSI color codes; widths are measured on the visible text.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(visible_width(cell));
            }
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let _ = writeln!(handle, "{}", format_row(&header_cells, &widths));
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(handle, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(handle, "{}", format_row(row, &widths));
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        // No trailing padding on the last column.
        if i + 1 < cells.len() {
            if let Some(width) = widths.get(i) {
                let pad = width.saturating_sub(visible_width(cell));
                line.push_str(&" ".repeat(pad));
            }
        }
    }
    line
}

/// Length of `s` without ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == '\u{1b}' {
            in_escape = true;
        } else {
            width += 1;
        }
    }
    width
}

/// Render a field value for human-readable output.
///
/// Strings print without quotes, `null` prints as `-`, and whole numbers
/// print without a fractional part.
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Some(other) => other.to_string(),
    }
}

/// Shortest display form of a number (`5`, `2.5`).
pub fn format_number(n: f64) -> String {
    format!("{}", n)
}
