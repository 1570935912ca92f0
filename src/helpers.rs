//! Shared helpers for numeric rounding and lenient JSON field handling.
//!
//! Two rounding strategies exist because the two CSV consumers care about
//! different things:
//!
//! - `round_f64`: rounds an f64 for writing, so the CSV keeps the shortest
//!   representation of the rounded value (`1.0`, `0.1235`).
//! - `round_decimal_fixed`: rounds a Decimal total and pins its scale, so
//!   totals always display with the same number of places (`4.00`).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Round an f64 to `places` decimal places.
///
/// Goes through the formatter rather than `(v * 10^n).round() / 10^n` so the
/// result matches the decimal text a reader would expect for the exact binary
/// value. Non-finite inputs are returned unchanged.
pub(crate) fn round_f64(v: f64, places: usize) -> f64 {
    if !v.is_finite() {
        tracing::warn!("round_f64 received non-finite value {}", v);
        return v;
    }
    format!("{:.*}", places, v).parse().unwrap_or(v)
}

/// Round a Decimal to `places` and fix its scale to exactly `places`.
pub(crate) fn round_decimal_fixed(d: Decimal, places: u32) -> Decimal {
    let mut rounded = d.round_dp(places);
    rounded.rescale(places);
    rounded
}

/// Convert a Decimal to f64, defaulting to 0.0 for values that can't be represented.
pub(crate) fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Read a JSON value that may be a number or a numeric string as f64.
///
/// Returns `None` for null, missing, non-numeric strings and other types.
pub(crate) fn json_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Text form of a JSON scalar as it should be stored in a plain-text record.
///
/// Strings are stored as given (trimmed), numbers in their JSON form.
pub(crate) fn json_to_text(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
