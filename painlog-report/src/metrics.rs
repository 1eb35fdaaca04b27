//! Scalar summaries over a filtered set of entries.
//!
//! Every function returns `None` or an empty list for an empty input; none of
//! them divides by zero.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use painlog_core::{
    DateWindow, DaySummary, InterferenceFactor, InterferenceScore, LogEntry, PainScore,
    PeriodMetrics, ReportConfig, TreatmentSummary,
};

use crate::filter::filter_window;

/// Running arithmetic mean that ignores absent samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

impl FromIterator<f64> for RunningMean {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = RunningMean::default();
        for value in iter {
            acc.push(Some(value));
        }
        acc
    }
}

/// Mean average-pain score. No-pain days count as 0.
pub fn average_pain(entries: &[&LogEntry]) -> Option<f64> {
    entries
        .iter()
        .filter_map(|entry| entry.pain_score(PainScore::Average))
        .map(f64::from)
        .collect::<RunningMean>()
        .mean()
}

/// Most frequently reported pain area. Ties go to the lexicographically
/// smallest label so the result does not depend on input order.
pub fn most_painful_area(entries: &[&LogEntry]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
        for area in &entry.pain_areas {
            *counts.entry(area.as_str()).or_insert(0) += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (area, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((area, count));
        }
    }
    best.map(|(area, _)| area.to_string())
}

/// Per-factor interference means in the fixed BPI order. Entries without a
/// value for a factor are left out of that factor's denominator.
pub fn interference_series(entries: &[&LogEntry]) -> Vec<InterferenceScore> {
    if entries.is_empty() {
        return Vec::new();
    }

    InterferenceFactor::ALL
        .into_iter()
        .map(|factor| {
            let acc: RunningMean = entries
                .iter()
                .filter_map(|entry| entry.interference.get(factor))
                .map(f64::from)
                .collect();
            InterferenceScore {
                factor,
                label: factor.label().to_string(),
                score: acc.mean(),
                samples: acc.count(),
            }
        })
        .collect()
}

#[derive(Default)]
struct TreatmentAccumulator {
    pain: RunningMean,
    relief: RunningMean,
    entries: usize,
}

/// Average pain per treatment, lowest first. Entries without a treatment are
/// grouped under `config.no_treatment_label`.
pub fn treatment_series(entries: &[&LogEntry], config: &ReportConfig) -> Vec<TreatmentSummary> {
    let mut groups: BTreeMap<&str, TreatmentAccumulator> = BTreeMap::new();
    for entry in entries {
        let label = entry
            .treatment()
            .unwrap_or(config.no_treatment_label.as_str());
        let group = groups.entry(label).or_default();
        group.entries += 1;
        group
            .pain
            .push(entry.pain_score(PainScore::Average).map(f64::from));
        // Relief only means something when a treatment was recorded.
        if entry.treatment().is_some() {
            group.relief.push(entry.treatment_relief);
        }
    }

    let mut rows: Vec<TreatmentSummary> = groups
        .into_iter()
        .map(|(label, acc)| TreatmentSummary {
            treatment: label.to_string(),
            average_pain: acc.pain.mean(),
            average_relief: acc.relief.mean(),
            entry_count: acc.entries,
        })
        .collect();

    // Stable sort keeps label order among equal means.
    rows.sort_by(|a, b| compare_optional_means(a.average_pain, b.average_pain));
    rows
}

fn compare_optional_means(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Headline numbers for one window.
pub fn period_metrics(entries: &[&LogEntry]) -> PeriodMetrics {
    PeriodMetrics {
        entry_count: entries.len(),
        pain_days: entries.iter().filter(|entry| entry.had_pain).count(),
        average_pain: average_pain(entries),
        most_painful_area: most_painful_area(entries),
        peak_worst_pain: entries
            .iter()
            .filter_map(|entry| entry.pain_score(PainScore::Worst))
            .max(),
        lowest_least_pain: entries
            .iter()
            .filter_map(|entry| entry.pain_score(PainScore::Least))
            .min(),
    }
}

/// Average pain over every entry logged on `date`.
pub fn day_summary(entries: &[LogEntry], date: NaiveDate) -> DaySummary {
    let day = filter_window(entries, &DateWindow::single_day(date));
    DaySummary {
        date,
        entry_count: day.len(),
        average_pain: average_pain(&day),
    }
}
