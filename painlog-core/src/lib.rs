//! Kiểu dữ liệu lõi cho nhật ký đau (BPI) và báo cáo tổng hợp.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Cấu hình điều chỉnh cách gom nhóm và gắn nhãn báo cáo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Ngày đầu tuần khi gom nhóm theo tuần.
    pub week_start: WeekStart,
    /// Nhãn dành cho các ngày không ghi nhận điều trị.
    pub no_treatment_label: String,
    /// Ký tự phân tách danh sách vùng đau trong trường `bpi2`.
    pub area_separator: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            no_treatment_label: "None".to_string(),
            area_separator: ",".to_string(),
        }
    }
}

impl ReportConfig {
    /// Kiểm tra cấu hình trước khi dùng.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.no_treatment_label.trim().is_empty() {
            return Err(ReportError::InvalidConfig(
                "no_treatment_label không được để trống".to_string(),
            ));
        }
        if self.area_separator.is_empty() {
            return Err(ReportError::InvalidConfig(
                "area_separator không được để trống".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

/// Một bản ghi nhật ký đau đã được chuẩn hoá.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub had_pain: bool,
    #[serde(default)]
    pub pain_areas: BTreeSet<String>,
    pub worst_pain: Option<u8>,
    pub least_pain: Option<u8>,
    pub average_pain: Option<u8>,
    pub current_pain: Option<u8>,
    pub treatment_name: Option<String>,
    pub treatment_relief: Option<f64>,
    #[serde(default)]
    pub interference: Interference,
}

impl LogEntry {
    /// Điểm đau theo quy ước: ngày không đau luôn được tính là 0.
    pub fn pain_score(&self, kind: PainScore) -> Option<u8> {
        if !self.had_pain {
            return Some(0);
        }
        match kind {
            PainScore::Worst => self.worst_pain,
            PainScore::Least => self.least_pain,
            PainScore::Average => self.average_pain,
            PainScore::Current => self.current_pain,
        }
    }

    /// Tên điều trị đã cắt khoảng trắng, `None` nếu rỗng.
    pub fn treatment(&self) -> Option<&str> {
        self.treatment_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Bốn thang điểm đau của BPI (bpi3..bpi6).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PainScore {
    Worst,
    Least,
    Average,
    Current,
}

/// Bảy điểm ảnh hưởng của cơn đau (bpi9a..bpi9g).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Interference {
    pub general_activity: Option<u8>,
    pub mood: Option<u8>,
    pub walking: Option<u8>,
    pub normal_work: Option<u8>,
    pub relations: Option<u8>,
    pub sleep: Option<u8>,
    pub enjoyment: Option<u8>,
}

impl Interference {
    pub fn get(&self, factor: InterferenceFactor) -> Option<u8> {
        match factor {
            InterferenceFactor::GeneralActivity => self.general_activity,
            InterferenceFactor::Mood => self.mood,
            InterferenceFactor::Walking => self.walking,
            InterferenceFactor::NormalWork => self.normal_work,
            InterferenceFactor::Relations => self.relations,
            InterferenceFactor::Sleep => self.sleep,
            InterferenceFactor::Enjoyment => self.enjoyment,
        }
    }

    pub fn set(&mut self, factor: InterferenceFactor, value: Option<u8>) {
        let slot = match factor {
            InterferenceFactor::GeneralActivity => &mut self.general_activity,
            InterferenceFactor::Mood => &mut self.mood,
            InterferenceFactor::Walking => &mut self.walking,
            InterferenceFactor::NormalWork => &mut self.normal_work,
            InterferenceFactor::Relations => &mut self.relations,
            InterferenceFactor::Sleep => &mut self.sleep,
            InterferenceFactor::Enjoyment => &mut self.enjoyment,
        };
        *slot = value;
    }
}

/// Các lĩnh vực sinh hoạt bị cơn đau ảnh hưởng, theo thứ tự cố định của BPI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum InterferenceFactor {
    GeneralActivity,
    Mood,
    Walking,
    NormalWork,
    Relations,
    Sleep,
    Enjoyment,
}

impl InterferenceFactor {
    pub const ALL: [InterferenceFactor; 7] = [
        InterferenceFactor::GeneralActivity,
        InterferenceFactor::Mood,
        InterferenceFactor::Walking,
        InterferenceFactor::NormalWork,
        InterferenceFactor::Relations,
        InterferenceFactor::Sleep,
        InterferenceFactor::Enjoyment,
    ];

    /// Tên trường trong kho dữ liệu ngoài.
    pub fn wire_key(self) -> &'static str {
        match self {
            InterferenceFactor::GeneralActivity => "bpi9a",
            InterferenceFactor::Mood => "bpi9b",
            InterferenceFactor::Walking => "bpi9c",
            InterferenceFactor::NormalWork => "bpi9d",
            InterferenceFactor::Relations => "bpi9e",
            InterferenceFactor::Sleep => "bpi9f",
            InterferenceFactor::Enjoyment => "bpi9g",
        }
    }

    /// Nhãn hiển thị trên biểu đồ.
    pub fn label(self) -> &'static str {
        match self {
            InterferenceFactor::GeneralActivity => "General Activity",
            InterferenceFactor::Mood => "Mood",
            InterferenceFactor::Walking => "Walking",
            InterferenceFactor::NormalWork => "Normal Work",
            InterferenceFactor::Relations => "Relations",
            InterferenceFactor::Sleep => "Sleep",
            InterferenceFactor::Enjoyment => "Enjoyment of Life",
        }
    }
}

/// Khoảng thời gian người dùng chọn để xem báo cáo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RangeSelector {
    #[default]
    #[serde(rename = "Last 7 days")]
    LastSevenDays,
    #[serde(rename = "Last month")]
    LastMonth,
    #[serde(rename = "Last year")]
    LastYear,
    #[serde(rename = "All time")]
    AllTime,
}

impl RangeSelector {
    pub const ALL: [RangeSelector; 4] = [
        RangeSelector::LastSevenDays,
        RangeSelector::LastMonth,
        RangeSelector::LastYear,
        RangeSelector::AllTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RangeSelector::LastSevenDays => "Last 7 days",
            RangeSelector::LastMonth => "Last month",
            RangeSelector::LastYear => "Last year",
            RangeSelector::AllTime => "All time",
        }
    }

    /// Tiêu đề kỳ so sánh ("Weekly Comparison", "Monthly Trends"...).
    pub fn period_label(self) -> &'static str {
        match self {
            RangeSelector::LastSevenDays => "Weekly",
            RangeSelector::LastMonth => "Monthly",
            RangeSelector::LastYear => "Yearly",
            RangeSelector::AllTime => "All Time",
        }
    }

    /// Độ mịn của chuỗi xu hướng cho khoảng thời gian này.
    pub fn granularity(self) -> Granularity {
        match self {
            RangeSelector::LastSevenDays => Granularity::Day,
            RangeSelector::LastMonth => Granularity::Week,
            RangeSelector::LastYear | RangeSelector::AllTime => Granularity::Month,
        }
    }
}

impl fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeSelector {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        RangeSelector::ALL
            .into_iter()
            .find(|range| range.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ReportError::UnknownRange(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// Cửa sổ nửa mở `[start, end)`. `start = None` nghĩa là không có cận dưới.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDateTime>,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDateTime>, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Cửa sổ phủ đúng một ngày lịch.
    pub fn single_day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::default());
        Self::new(Some(start), start + Duration::days(1))
    }

    /// Ngày được so sánh theo thời điểm nửa đêm bắt đầu ngày đó.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let instant = date.and_time(NaiveTime::default());
        self.start.map_or(true, |start| start <= instant) && instant < self.end
    }

    /// Độ dài cửa sổ; không xác định khi không có cận dưới.
    pub fn duration(&self) -> Option<Duration> {
        self.start.map(|start| self.end - start)
    }
}

/// Một điểm trên biểu đồ xu hướng (ngày, tuần hoặc tháng).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub period_start: NaiveDate,
    pub label: String,
    pub entry_count: usize,
    pub worst_pain: Option<f64>,
    pub least_pain: Option<f64>,
    pub average_pain: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterferenceScore {
    pub factor: InterferenceFactor,
    pub label: String,
    pub score: Option<f64>,
    pub samples: usize,
}

/// Mức đau trung bình theo từng phương pháp điều trị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentSummary {
    pub treatment: String,
    pub average_pain: Option<f64>,
    pub average_relief: Option<f64>,
    pub entry_count: usize,
}

/// Chỉ số tổng hợp của một kỳ. `entry_count == 0` là trạng thái "không có dữ liệu".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PeriodMetrics {
    pub entry_count: usize,
    pub pain_days: usize,
    pub average_pain: Option<f64>,
    pub most_painful_area: Option<String>,
    pub peak_worst_pain: Option<u8>,
    pub lowest_least_pain: Option<u8>,
}

impl PeriodMetrics {
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

/// Tóm tắt trong ngày cho màn hình chính: điểm đau trung bình của mọi bản ghi cùng ngày.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub average_pain: Option<f64>,
}

impl DaySummary {
    /// Dòng hiển thị, ví dụ "Average pain 4.50" hoặc "No pain entry for 2024-01-10".
    pub fn message(&self) -> String {
        match self.average_pain {
            Some(average) => format!("Average pain {average:.2}"),
            None if self.entry_count == 0 => format!("No pain entry for {}", self.date),
            None => format!("No pain score for {}", self.date),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDirection {
    Improved,
    Worsened,
    Steady,
}

/// Chênh lệch mức đau trung bình so với kỳ trước.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PainDelta {
    pub value: Option<f64>,
    pub direction: Option<DeltaDirection>,
    pub display: String,
}

/// Thay đổi vùng đau nhiều nhất so với kỳ trước.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AreaTrend {
    Changed { previous: String },
    Unchanged,
    NotAvailable,
}

impl AreaTrend {
    pub fn label(&self) -> Option<String> {
        match self {
            AreaTrend::Changed { previous } => Some(format!("was {previous}")),
            AreaTrend::Unchanged => Some("No change".to_string()),
            AreaTrend::NotAvailable => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonDeltas {
    pub pain: PainDelta,
    pub area: AreaTrend,
}

/// Kết quả tổng hợp cuối cùng cho lớp hiển thị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportBundle {
    pub range: RangeSelector,
    pub period_label: String,
    pub granularity: Granularity,
    pub now: NaiveDateTime,
    pub current_window: DateWindow,
    pub previous_window: Option<DateWindow>,
    pub has_entries: bool,
    pub trend_series: Vec<TrendPoint>,
    pub interference_series: Vec<InterferenceScore>,
    pub treatment_series: Vec<TreatmentSummary>,
    pub current_metrics: PeriodMetrics,
    pub previous_metrics: Option<PeriodMetrics>,
    pub deltas: ComparisonDeltas,
}

impl ReportBundle {
    /// Chuỗi xu hướng đã sắp xếp tăng dần theo thời gian.
    pub fn trend(&self) -> &[TrendPoint] {
        &self.trend_series
    }

    /// Có kỳ trước để so sánh hay không ("All time" thì không).
    pub fn has_comparison(&self) -> bool {
        self.previous_metrics.is_some()
    }
}

/// Lỗi ở biên vào/ra của bộ tổng hợp. Bản thân bộ tổng hợp không bao giờ lỗi.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Khoảng thời gian không hợp lệ: {0}")]
    UnknownRange(String),
    #[error("Cấu hình không hợp lệ: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::default())
    }

    #[test]
    fn range_selector_parses_display_names() {
        for range in RangeSelector::ALL {
            assert_eq!(range.as_str().parse::<RangeSelector>().unwrap(), range);
        }
        assert_eq!(
            " last MONTH ".parse::<RangeSelector>().unwrap(),
            RangeSelector::LastMonth
        );
        assert!(matches!(
            "Last fortnight".parse::<RangeSelector>(),
            Err(ReportError::UnknownRange(_))
        ));
    }

    #[test]
    fn range_selector_serializes_as_display_name() {
        let json = serde_json::to_string(&RangeSelector::AllTime).unwrap();
        assert_eq!(json, "\"All time\"");
    }

    #[test]
    fn window_is_half_open() {
        let window = DateWindow::new(Some(at(2024, 1, 1)), at(2024, 1, 8));
        assert!(window.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(window.contains(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
        assert_eq!(window.duration(), Some(Duration::days(7)));
    }

    #[test]
    fn unbounded_window_has_no_duration() {
        let window = DateWindow::new(None, at(2024, 1, 8));
        assert!(window.contains(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()));
        assert_eq!(window.duration(), None);
    }

    #[test]
    fn no_pain_day_scores_zero() {
        let entry = LogEntry {
            had_pain: false,
            average_pain: None,
            ..LogEntry::default()
        };
        assert_eq!(entry.pain_score(PainScore::Average), Some(0));
        assert_eq!(entry.pain_score(PainScore::Worst), Some(0));
    }

    #[test]
    fn blank_treatment_is_none() {
        let entry = LogEntry {
            treatment_name: Some("  ".to_string()),
            ..LogEntry::default()
        };
        assert_eq!(entry.treatment(), None);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ReportConfig::default().validate().is_ok());
        let config = ReportConfig {
            no_treatment_label: " ".to_string(),
            ..ReportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn single_day_window_holds_only_that_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let window = DateWindow::single_day(date);
        assert!(window.contains(date));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()));
    }

    #[test]
    fn day_summary_message() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let empty = DaySummary {
            date,
            entry_count: 0,
            average_pain: None,
        };
        assert_eq!(empty.message(), "No pain entry for 2024-01-10");
        let scored = DaySummary {
            average_pain: Some(4.5),
            entry_count: 2,
            ..empty
        };
        assert_eq!(scored.message(), "Average pain 4.50");
    }

    #[test]
    fn error_variants_cover_input_edges() {
        let errors = [
            ReportError::Parse("x".to_string()),
            ReportError::UnknownRange("x".to_string()),
            ReportError::InvalidConfig("x".to_string()),
        ];
        for err in errors {
            match &err {
                ReportError::Parse(_)
                | ReportError::UnknownRange(_)
                | ReportError::InvalidConfig(_) => assert!(err.to_string().ends_with(": x")),
            }
        }
    }
}
