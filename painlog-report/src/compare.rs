use painlog_core::{AreaTrend, ComparisonDeltas, DeltaDirection, PainDelta, PeriodMetrics};

const NOT_AVAILABLE: &str = "N/A";

/// Deltas between the current window and its predecessor. `previous` is
/// `None` when there is no comparison window.
pub fn compare(current: &PeriodMetrics, previous: Option<&PeriodMetrics>) -> ComparisonDeltas {
    ComparisonDeltas {
        pain: pain_delta(
            current.average_pain,
            previous.and_then(|metrics| metrics.average_pain),
        ),
        area: area_trend(
            current.most_painful_area.as_deref(),
            previous.and_then(|metrics| metrics.most_painful_area.as_deref()),
        ),
    }
}

pub fn pain_delta(current: Option<f64>, previous: Option<f64>) -> PainDelta {
    let (Some(current), Some(previous)) = (current, previous) else {
        return PainDelta {
            value: None,
            direction: None,
            display: NOT_AVAILABLE.to_string(),
        };
    };

    let value = current - previous;
    // Direction follows what is displayed, two decimals.
    let rounded = (value * 100.0).round() / 100.0;
    let (direction, display) = if rounded > 0.0 {
        (DeltaDirection::Worsened, format!("+{rounded:.2}"))
    } else if rounded < 0.0 {
        (DeltaDirection::Improved, format!("{rounded:.2}"))
    } else {
        (DeltaDirection::Steady, "0.00".to_string())
    };

    PainDelta {
        value: Some(value),
        direction: Some(direction),
        display,
    }
}

/// Area change is only reported against a known previous area.
pub fn area_trend(current: Option<&str>, previous: Option<&str>) -> AreaTrend {
    match previous {
        None => AreaTrend::NotAvailable,
        Some(previous) if current == Some(previous) => AreaTrend::Unchanged,
        Some(previous) => AreaTrend::Changed {
            previous: previous.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(average: Option<f64>, area: Option<&str>) -> PeriodMetrics {
        PeriodMetrics {
            entry_count: 1,
            average_pain: average,
            most_painful_area: area.map(str::to_string),
            ..PeriodMetrics::default()
        }
    }

    #[test]
    fn delta_when_both_periods_have_data() {
        let delta = pain_delta(Some(5.5), Some(4.25));
        assert_eq!(delta.value, Some(1.25));
        assert_eq!(delta.direction, Some(DeltaDirection::Worsened));
        assert_eq!(delta.display, "+1.25");

        let delta = pain_delta(Some(3.0), Some(3.5));
        assert_eq!(delta.direction, Some(DeltaDirection::Improved));
        assert_eq!(delta.display, "-0.50");

        let delta = pain_delta(Some(2.0), Some(2.0));
        assert_eq!(delta.direction, Some(DeltaDirection::Steady));
        assert_eq!(delta.display, "0.00");
    }

    #[test]
    fn delta_unavailable_without_both_values() {
        for (current, previous) in [(Some(3.0), None), (None, Some(3.0)), (None, None)] {
            let delta = pain_delta(current, previous);
            assert_eq!(delta.value, None);
            assert_eq!(delta.direction, None);
            assert_eq!(delta.display, "N/A");
        }
    }

    #[test]
    fn area_trend_variants() {
        assert_eq!(
            area_trend(Some("Back"), Some("Neck")),
            AreaTrend::Changed {
                previous: "Neck".to_string()
            }
        );
        assert_eq!(area_trend(Some("Back"), Some("Back")), AreaTrend::Unchanged);
        assert_eq!(area_trend(Some("Back"), None), AreaTrend::NotAvailable);
        assert_eq!(
            area_trend(None, Some("Hip")).label().as_deref(),
            Some("was Hip")
        );
        assert_eq!(AreaTrend::NotAvailable.label(), None);
    }

    #[test]
    fn compare_without_previous_window() {
        let deltas = compare(&metrics(Some(4.0), Some("Back")), None);
        assert_eq!(deltas.pain.value, None);
        assert_eq!(deltas.area, AreaTrend::NotAvailable);
    }

    #[test]
    fn compare_with_empty_previous_window() {
        let deltas = compare(
            &metrics(Some(4.0), Some("Back")),
            Some(&PeriodMetrics::default()),
        );
        assert_eq!(deltas.pain.display, "N/A");
        assert_eq!(deltas.area, AreaTrend::NotAvailable);
    }
}
