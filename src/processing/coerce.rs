//! Cell coercion: text to numbers and dates.
//!
//! Coercion never fails. A cell that cannot be interpreted becomes [`Value::Null`], so row count
//! and alignment are always preserved.

use chrono::{Datelike, NaiveDate};

use crate::types::{DataSet, Value};

/// Parse a decimal number. Blank, malformed, and non-finite inputs are missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric view of a single cell.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Float64(v) if v.is_finite() => Some(*v),
        Value::Utf8(s) => parse_number(s),
        _ => None,
    }
}

/// Numeric view of column `idx`, aligned row-for-row with `dataset`.
pub fn numeric_column(dataset: &DataSet, idx: usize) -> Vec<Option<f64>> {
    dataset.column_values(idx).map(numeric_value).collect()
}

/// Parse a calendar date, trying `formats` in order.
///
/// A trailing time component (`2024-01-10 00:00:00`, `2024-01-10T08:30:00`) is ignored, which
/// covers spreadsheet date cells rendered as text. Years below 1000 are rejected so that a
/// four-digit-year format cannot swallow a two-digit year (`03/04/24`).
pub fn parse_date<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidates = [
        Some(trimmed),
        trimmed.split_once(char::is_whitespace).map(|(d, _)| d),
        trimmed.split_once('T').map(|(d, _)| d),
    ];
    for candidate in candidates.into_iter().flatten() {
        for fmt in formats {
            match NaiveDate::parse_from_str(candidate, fmt.as_ref()) {
                Ok(d) if d.year() >= 1000 => return Some(d),
                _ => {}
            }
        }
    }
    None
}

/// Date view of a single cell.
pub fn date_value<S: AsRef<str>>(value: &Value, formats: &[S]) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Utf8(s) => parse_date(s, formats),
        _ => None,
    }
}

/// `YYYY-MM` period string of a date.
pub fn year_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
