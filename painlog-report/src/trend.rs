//! Day/week/month buckets for the pain trend chart.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use painlog_core::{Granularity, LogEntry, PainScore, TrendPoint, WeekStart};

use crate::metrics::RunningMean;

/// First day of the bucket `date` falls into.
pub fn bucket_start(date: NaiveDate, granularity: Granularity, week_start: WeekStart) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => {
            let offset = match week_start {
                WeekStart::Sunday => date.weekday().num_days_from_sunday(),
                WeekStart::Monday => date.weekday().num_days_from_monday(),
            };
            date.checked_sub_days(Days::new(u64::from(offset)))
                .unwrap_or(date)
        }
        Granularity::Month => date.with_day(1).unwrap_or(date),
    }
}

fn bucket_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day | Granularity::Week => start.format("%m/%d").to_string(),
        Granularity::Month => start.format("%b %Y").to_string(),
    }
}

#[derive(Default)]
struct BucketAccumulator {
    entries: usize,
    worst: RunningMean,
    least: RunningMean,
    average: RunningMean,
}

impl BucketAccumulator {
    fn push(&mut self, entry: &LogEntry) {
        self.entries += 1;
        self.worst
            .push(entry.pain_score(PainScore::Worst).map(f64::from));
        self.least
            .push(entry.pain_score(PainScore::Least).map(f64::from));
        self.average
            .push(entry.pain_score(PainScore::Average).map(f64::from));
    }
}

/// Group entries into buckets and average each pain dimension independently.
/// A dimension nobody reported in a bucket stays `None`.
pub fn build_trend(
    entries: &[&LogEntry],
    granularity: Granularity,
    week_start: WeekStart,
) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<NaiveDate, BucketAccumulator> = BTreeMap::new();
    for entry in entries {
        buckets
            .entry(bucket_start(entry.date, granularity, week_start))
            .or_default()
            .push(entry);
    }

    buckets
        .into_iter()
        .map(|(start, acc)| TrendPoint {
            period_start: start,
            label: bucket_label(start, granularity),
            entry_count: acc.entries,
            worst_pain: acc.worst.mean(),
            least_pain: acc.least.mean(),
            average_pain: acc.average.mean(),
        })
        .collect()
}
