//! Decoding of `pain_entries` rows (`date`, `bpi1`..`bpi9g`) into [`LogEntry`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use painlog_core::{Interference, InterferenceFactor, LogEntry, ReportConfig, ReportError};
use serde_json::Value;

/// Decode a JSON array of rows from a string.
pub fn parse_entries_str(
    entries_json: &str,
    config: &ReportConfig,
) -> Result<Vec<LogEntry>, ReportError> {
    let value: Value =
        serde_json::from_str(entries_json).map_err(|err| ReportError::Parse(err.to_string()))?;
    parse_entries_value(&value, config)
}

/// Decode a JSON array of rows. Rows without a readable date are skipped.
pub fn parse_entries_value(
    value: &Value,
    config: &ReportConfig,
) -> Result<Vec<LogEntry>, ReportError> {
    let rows = value.as_array().ok_or_else(|| {
        ReportError::Parse("Expected a JSON array of pain entries".to_string())
    })?;

    let mut entries = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match decode_entry(row, config) {
            Some(entry) => entries.push(entry),
            None => tracing::warn!(index, "Skipping pain entry without a readable date"),
        }
    }

    tracing::debug!(
        rows = rows.len(),
        decoded = entries.len(),
        "Decoded pain entries"
    );
    Ok(entries)
}

/// Decode a single row. Malformed score fields become `None`; only a missing
/// or unparseable `date` rejects the row.
pub fn decode_entry(row: &Value, config: &ReportConfig) -> Option<LogEntry> {
    let date = row.get("date").and_then(Value::as_str).and_then(parse_date)?;

    let worst_pain = score_field(row, "bpi3");
    let least_pain = score_field(row, "bpi4");
    let average_pain = score_field(row, "bpi5");
    let current_pain = score_field(row, "bpi6");

    let had_pain = pain_flag(row.get("bpi1")).unwrap_or_else(|| {
        [worst_pain, least_pain, average_pain, current_pain]
            .iter()
            .any(Option::is_some)
    });

    let mut interference = Interference::default();
    for factor in InterferenceFactor::ALL {
        interference.set(factor, score_field(row, factor.wire_key()));
    }

    Some(LogEntry {
        date,
        had_pain,
        pain_areas: parse_areas(row.get("bpi2"), &config.area_separator),
        worst_pain,
        least_pain,
        average_pain,
        current_pain,
        treatment_name: row
            .get("bpi7")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        treatment_relief: numeric_field(row.get("bpi8")).filter(|relief| *relief >= 0.0),
        interference,
    })
}

/// Accepts `YYYY-MM-DD` or a datetime starting with it.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let prefix = value.get(..10)?;
    let rest = &value[10..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn pain_flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("yes") {
                Some(true)
            } else if text.eq_ignore_ascii_case("no") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn parse_areas(value: Option<&Value>, separator: &str) -> BTreeSet<String> {
    let mut areas = BTreeSet::new();
    match value {
        Some(Value::String(text)) => {
            areas.extend(
                text.split(separator)
                    .map(str::trim)
                    .filter(|area| !area.is_empty())
                    .map(str::to_string),
            );
        }
        Some(Value::Array(items)) => {
            areas.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|area| !area.is_empty())
                    .map(str::to_string),
            );
        }
        _ => {}
    }
    areas
}

fn numeric_field(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Scores are whole numbers on the 0-10 scale; anything else is treated as absent.
fn score_field(row: &Value, key: &str) -> Option<u8> {
    let number = numeric_field(row.get(key))?;
    if number.fract() != 0.0 || !(0.0..=10.0).contains(&number) {
        return None;
    }
    Some(number as u8)
}
