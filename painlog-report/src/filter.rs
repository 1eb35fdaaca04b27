use painlog_core::{DateWindow, LogEntry};

/// Keep entries dated inside `window` (`start <= date < end`), preserving order.
pub fn filter_window<'a, I>(entries: I, window: &DateWindow) -> Vec<&'a LogEntry>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    entries
        .into_iter()
        .filter(|entry| window.contains(entry.date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    }

    fn midnight(offset: i64) -> NaiveDateTime {
        day(offset).and_hms_opt(0, 0, 0).unwrap()
    }

    fn entries() -> Vec<LogEntry> {
        // Deliberately unordered with a duplicate date.
        [5, -3, 0, 7, 2, 2, 10, 6]
            .into_iter()
            .map(|offset| LogEntry {
                date: day(offset),
                average_pain: Some((offset.rem_euclid(10)) as u8),
                had_pain: true,
                ..LogEntry::default()
            })
            .collect()
    }

    #[test]
    fn boundaries_are_half_open() {
        let entries = entries();
        let window = DateWindow::new(Some(midnight(0)), midnight(7));
        let kept: Vec<i64> = filter_window(&entries, &window)
            .iter()
            .map(|entry| (entry.date - day(0)).num_days())
            .collect();
        assert_eq!(kept, vec![5, 0, 2, 2, 6]);
    }

    #[test]
    fn membership_matches_window_exactly() {
        let entries = entries();
        for (start, end) in [(-5, 0), (0, 1), (2, 3), (-10, 20), (6, 6)] {
            let window = DateWindow::new(Some(midnight(start)), midnight(end));
            let kept = filter_window(&entries, &window);
            for entry in &entries {
                let inside = day(start) <= entry.date && entry.date < day(end);
                let was_kept = kept.iter().any(|k| std::ptr::eq(*k, entry));
                assert_eq!(inside, was_kept, "window {start}..{end} entry {}", entry.date);
            }
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let entries = entries();
        for window in [
            DateWindow::new(Some(midnight(1)), midnight(6)),
            DateWindow::new(None, midnight(3)),
            DateWindow::new(Some(midnight(20)), midnight(30)),
        ] {
            let once = filter_window(&entries, &window);
            let twice = filter_window(once.iter().copied(), &window);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn unbounded_start_keeps_everything_before_end() {
        let entries = entries();
        let window = DateWindow::new(None, midnight(100));
        assert_eq!(filter_window(&entries, &window).len(), entries.len());
    }
}
