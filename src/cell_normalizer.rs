//! Conversion of raw calamine cell values into the canonical [`CellValue`] kinds.
//!
//! This is the only place that looks at [`calamine::Data`]; everything downstream works on
//! [`CellValue`]. Normalization is total: a value that cannot be rendered the intended way
//! degrades to its plain string form.

use calamine::{Data, ExcelDateTime};
use chrono::{NaiveDate, TimeDelta};
use serde::ser::{Serialize, Serializer};

/// Largest integer an f64 holds exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// First serial past 9999-12-31; chrono overflows on anything larger
const SERIAL_LIMIT: f64 = 2_958_466.0;

/// A populated cell's value after normalization
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(text) => serializer.serialize_str(text),
            CellValue::Integer(n) => serializer.serialize_i64(*n),
            CellValue::Float(n) => serializer.serialize_f64(*n),
            CellValue::Boolean(b) => serializer.serialize_bool(*b),
            CellValue::Date(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
        }
    }
}

/// Normalize one raw cell. Returns `None` for empty cells.
pub fn normalize_cell(raw: &Data) -> Option<CellValue> {
    let value = match raw {
        Data::Empty => return None,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(n) => CellValue::Integer(*n),
        Data::Float(n) => normalize_number(*n),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => normalize_excel_datetime(dt)
            .unwrap_or_else(|| CellValue::Text(dt.as_f64().to_string())),
        Data::DateTimeIso(iso) => parse_iso_date(iso)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(iso.clone())),
        Data::DurationIso(iso) => CellValue::Text(iso.clone()),
        Data::Error(err) => CellValue::Text(err.to_string()),
    };
    Some(value)
}

fn normalize_number(n: f64) -> CellValue {
    if !n.is_finite() {
        return CellValue::Text(n.to_string());
    }
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        CellValue::Integer(n as i64)
    } else {
        CellValue::Float(n)
    }
}

/// Date serials become calendar dates and durations become `HH:MM:SS` text.
///
/// Returns `None` for serials with no rendering: negative dates and anything beyond
/// 9999-12-31 in either direction.
fn normalize_excel_datetime(dt: &ExcelDateTime) -> Option<CellValue> {
    let serial = dt.as_f64();
    if !serial.is_finite() || serial.abs() >= SERIAL_LIMIT {
        return None;
    }
    if dt.is_duration() {
        return dt
            .as_duration()
            .map(|duration| CellValue::Text(format_duration(duration)));
    }
    if serial < 0.0 {
        return None;
    }

    let date = dt.as_datetime()?.date();
    // Time-only serials land before the 1900 epoch and read as its first day
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    Some(CellValue::Date(date.max(epoch)))
}

fn format_duration(duration: TimeDelta) -> String {
    let total_millis = duration.num_milliseconds();
    let sign = if total_millis < 0 { "-" } else { "" };
    let mut millis = total_millis.abs();
    let hours = millis / 3_600_000;
    millis %= 3_600_000;
    let minutes = millis / 60_000;
    millis %= 60_000;
    let seconds = millis / 1_000;
    let remainder = millis % 1_000;
    if remainder > 0 {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{remainder:03}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Accepts "2024-03-15", "2024-03-15T10:30:00" and similar ISO forms
fn parse_iso_date(iso: &str) -> Option<NaiveDate> {
    let date_part = iso.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
