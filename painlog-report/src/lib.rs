//! Pain log rows to `ReportBundle`: windowing, aggregation, trends and
//! period comparison.

pub mod compare;
pub mod filter;
pub mod metrics;
pub mod range;
pub mod record;
pub mod trend;

use chrono::{NaiveDate, NaiveDateTime};
use painlog_core::{DaySummary, LogEntry, RangeSelector, ReportBundle, ReportConfig, ReportError};
use serde_json::Value;

pub use metrics::day_summary;
pub use range::parse_reference_instant;
pub use record::{parse_entries_str, parse_entries_value};

/// Build a report from a JSON array of `pain_entries` rows.
pub fn summarize_entries_str(
    entries_json: &str,
    range: RangeSelector,
    now: NaiveDateTime,
    config: &ReportConfig,
) -> Result<ReportBundle, ReportError> {
    let value: Value =
        serde_json::from_str(entries_json).map_err(|err| ReportError::Parse(err.to_string()))?;
    summarize_entries_value(&value, range, now, config)
}

/// Build a report from a `serde_json::Value` holding the rows.
pub fn summarize_entries_value(
    entries: &Value,
    range: RangeSelector,
    now: NaiveDateTime,
    config: &ReportConfig,
) -> Result<ReportBundle, ReportError> {
    config.validate()?;
    let entries = parse_entries_value(entries, config)?;
    Ok(compute_report(&entries, range, now, config))
}

/// Average pain for one calendar date from a `serde_json::Value` holding the rows.
pub fn summarize_day_value(
    entries: &Value,
    date: NaiveDate,
    config: &ReportConfig,
) -> Result<DaySummary, ReportError> {
    config.validate()?;
    let entries = parse_entries_value(entries, config)?;
    Ok(day_summary(&entries, date))
}

/// Recompute every report output from a snapshot of entries.
///
/// Pure: the same `(entries, range, now, config)` always gives the same bundle.
/// Empty input or empty windows produce "no data" sentinels, never an error.
pub fn compute_report(
    entries: &[LogEntry],
    range: RangeSelector,
    now: NaiveDateTime,
    config: &ReportConfig,
) -> ReportBundle {
    let windows = range::resolve(range, now);
    let granularity = range.granularity();

    let current = filter::filter_window(entries, &windows.current);
    let current_metrics = metrics::period_metrics(&current);

    let previous_metrics = windows.previous.as_ref().map(|window| {
        let previous = filter::filter_window(entries, window);
        metrics::period_metrics(&previous)
    });

    let deltas = compare::compare(&current_metrics, previous_metrics.as_ref());

    tracing::debug!(
        range = %range,
        total = entries.len(),
        current = current_metrics.entry_count,
        previous = previous_metrics.as_ref().map(|metrics| metrics.entry_count),
        "Computed pain report"
    );

    ReportBundle {
        range,
        period_label: range.period_label().to_string(),
        granularity,
        now,
        current_window: windows.current,
        previous_window: windows.previous,
        has_entries: !entries.is_empty(),
        trend_series: trend::build_trend(&current, granularity, config.week_start),
        interference_series: metrics::interference_series(&current),
        treatment_series: metrics::treatment_series(&current, config),
        current_metrics,
        previous_metrics,
        deltas,
    }
}
