//! Numeric coercion of field values.
//!
//! Form values arrive as whatever the input widget produced: numbers,
//! numeric strings, booleans from checkboxes, or nothing at all. Every shape
//! maps to a finite `f64`; anything that cannot be read as a number is 0.

use serde_json::Value;

/// Coerce a field value to a finite number.
///
/// - `null` -> 0
/// - `true` / `false` -> 1 / 0
/// - numbers as-is
/// - strings via [`parse_numeric`]
/// - a single-element array coerces its element; other arrays and objects -> 0
pub fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_numeric(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => to_number(single),
            _ => 0.0,
        },
        Value::Object(_) => 0.0,
    };
    finite_or_zero(n)
}

/// Parse numeric text the way a form field would read it.
///
/// Surrounding whitespace is ignored and empty text is 0. Anything
/// [`numeric_literal`] rejects is 0.
pub fn parse_numeric(text: &str) -> f64 {
    numeric_literal(text).unwrap_or(0.0)
}

/// Read text as a number, or `None` if it is not one.
///
/// Accepts decimal notation with optional sign and exponent, and unsigned
/// `0x`/`0o`/`0b` integer prefixes. Empty text, other words (including
/// `inf` and `NaN`) and values that overflow to infinity are rejected.
pub fn numeric_literal(text: &str) -> Option<f64> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Some((radix, digits)) = radix_prefix(s) {
        // A prefix with bad digits is not a number at all, not a decimal.
        if digits.starts_with('+') {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }

    if s.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) {
        return None;
    }

    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn radix_prefix(s: &str) -> Option<(u32, &str)> {
    match s.get(..2)? {
        "0x" | "0X" => Some((16, &s[2..])),
        "0o" | "0O" => Some((8, &s[2..])),
        "0b" | "0B" => Some((2, &s[2..])),
        _ => None,
    }
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() { n } else { 0.0 }
}
