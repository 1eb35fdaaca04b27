//! Range selector → current window and its equal-duration predecessor.

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use painlog_core::{DateWindow, RangeSelector, ReportError};

/// Current window `[start, now)` plus the comparison baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub current: DateWindow,
    /// `None` when the current window has no lower bound ("All time").
    pub previous: Option<DateWindow>,
}

pub fn resolve(range: RangeSelector, now: NaiveDateTime) -> ResolvedRange {
    let current = DateWindow::new(window_start(range, now), now);
    let previous = previous_window(&current);

    tracing::debug!(
        range = %range,
        start = ?current.start,
        end = %current.end,
        previous_start = ?previous.and_then(|window| window.start),
        "Resolved report windows"
    );

    ResolvedRange { current, previous }
}

fn window_start(range: RangeSelector, now: NaiveDateTime) -> Option<NaiveDateTime> {
    match range {
        RangeSelector::LastSevenDays => now.checked_sub_signed(Duration::days(7)),
        RangeSelector::LastMonth => now.checked_sub_months(Months::new(1)),
        RangeSelector::LastYear => now.checked_sub_months(Months::new(12)),
        RangeSelector::AllTime => None,
    }
}

/// The window of the same duration ending where `current` starts.
pub fn previous_window(current: &DateWindow) -> Option<DateWindow> {
    let start = current.start?;
    let duration = current.duration()?;
    let previous_start = start.checked_sub_signed(duration)?;
    Some(DateWindow::new(Some(previous_start), start))
}

/// Parse a reference instant: `YYYY-MM-DD` (midnight) or
/// `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds.
pub fn parse_reference_instant(value: &str) -> Result<NaiveDateTime, ReportError> {
    let value = value.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ReportError::Parse(format!("Invalid reference instant: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn last_seven_days() {
        let resolved = resolve(RangeSelector::LastSevenDays, at(2024, 1, 3, 0));
        assert_eq!(resolved.current.start, Some(at(2023, 12, 27, 0)));
        assert_eq!(resolved.current.end, at(2024, 1, 3, 0));

        let previous = resolved.previous.unwrap();
        assert_eq!(previous.start, Some(at(2023, 12, 20, 0)));
        assert_eq!(previous.end, at(2023, 12, 27, 0));
    }

    #[test]
    fn last_month_previous_matches_actual_duration() {
        // 2024-03-31 minus one month clamps to 2024-02-29: a 31 day window.
        let resolved = resolve(RangeSelector::LastMonth, at(2024, 3, 31, 12));
        assert_eq!(resolved.current.start, Some(at(2024, 2, 29, 12)));

        let previous = resolved.previous.unwrap();
        assert_eq!(previous.end, at(2024, 2, 29, 12));
        assert_eq!(previous.start, Some(at(2024, 1, 29, 12)));
        assert_eq!(previous.duration(), resolved.current.duration());
    }

    #[test]
    fn last_year_spans_leap_day() {
        let resolved = resolve(RangeSelector::LastYear, at(2024, 6, 1, 0));
        assert_eq!(resolved.current.start, Some(at(2023, 6, 1, 0)));
        assert_eq!(
            resolved.current.duration(),
            Some(Duration::days(366))
        );
        let previous = resolved.previous.unwrap();
        assert_eq!(previous.start, Some(at(2022, 5, 31, 0)));
    }

    #[test]
    fn all_time_has_no_previous_window() {
        let resolved = resolve(RangeSelector::AllTime, at(2024, 6, 1, 0));
        assert_eq!(resolved.current.start, None);
        assert_eq!(resolved.previous, None);
    }

    #[test]
    fn previous_windows_are_adjacent_and_equal_length() {
        let now = at(2025, 3, 15, 9);
        for range in [
            RangeSelector::LastSevenDays,
            RangeSelector::LastMonth,
            RangeSelector::LastYear,
        ] {
            let resolved = resolve(range, now);
            let previous = resolved.previous.unwrap();
            assert_eq!(Some(previous.end), resolved.current.start);
            assert_eq!(previous.duration(), resolved.current.duration());
        }
    }

    #[test]
    fn reference_instant_formats() {
        assert_eq!(
            parse_reference_instant("2024-01-10").unwrap(),
            at(2024, 1, 10, 0)
        );
        assert_eq!(
            parse_reference_instant("2024-01-10T09:00:00").unwrap(),
            at(2024, 1, 10, 9)
        );
        assert_eq!(
            parse_reference_instant(" 2024-01-10 09:00:00 ").unwrap(),
            at(2024, 1, 10, 9)
        );
        let fractional = parse_reference_instant("2024-01-10T09:00:00.5").unwrap();
        assert_eq!(fractional - at(2024, 1, 10, 9), Duration::milliseconds(500));

        assert!(matches!(
            parse_reference_instant("yesterday"),
            Err(ReportError::Parse(_))
        ));
        assert!(parse_reference_instant("2024-13-01").is_err());
    }
}
