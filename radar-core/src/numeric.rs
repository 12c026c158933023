//! Numeric coercion and small math helpers shared by the engines.
//!
//! Every loosely typed input (JSON numbers, percent strings, decimal commas)
//! passes through `parse_numeric` exactly once, before any scoring arithmetic.
//! The result is a finite `f64` or `None`; nothing here ever returns NaN.

use chrono::NaiveDate;
use serde_json::Value;

/// Coerce a JSON value into a finite number.
///
/// Accepted forms:
/// - JSON numbers (`0.08`, `2000000`)
/// - numeric strings, with `.` or `,` as the decimal separator (`"0.08"`, `"0,08"`)
/// - percent strings, divided by 100 (`"8%"`, `"8,0 %"`)
///
/// Everything else (null, booleans, arrays, objects, empty or garbage strings,
/// NaN, infinities) yields `None`.
///
/// Booleans are not numbers here: `true` is absent, not 1.0. Boolean
/// settings go through [`parse_flag`] instead.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// Coerce a JSON value into a boolean setting.
pub fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// String half of [`parse_numeric`].
pub fn parse_numeric_str(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(pct) = s.strip_suffix('%') {
        return parse_plain(pct.trim()).map(|v| v / 100.0);
    }
    parse_plain(s)
}

fn parse_plain(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse::<f64>().ok().and_then(finite)
}

/// Normalize a date-ish JSON value to a calendar date.
///
/// Strings are cut to their first ten characters, so `"2024-06-28"`,
/// `"2024-06-28T00:00:00Z"` and `"2024-06-28 16:00"` all map to the same day.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        _ => None,
    }
}

pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let head: String = raw.trim().chars().take(10).collect();
    NaiveDate::parse_from_str(&head, "%Y-%m-%d").ok()
}

/// `Some(v)` if `v` is finite, else `None`.
#[inline]
pub fn finite(v: f64) -> Option<f64> {
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

/// Clamp to `[min, max]`.
#[inline]
pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

/// Clamp to the score range `[0, 100]`.
#[inline]
pub fn clamp_score(x: f64) -> f64 {
    clamp(x, 0.0, 100.0)
}
