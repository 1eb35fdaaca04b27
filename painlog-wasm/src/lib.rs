//! Bridge WASM <-> JavaScript cho bộ tổng hợp báo cáo nhật ký đau.

use painlog_core::{RangeSelector, ReportConfig, ReportError, WeekStart};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsReportConfig {
    #[serde(default)]
    week_start: Option<WeekStart>,
    #[serde(default)]
    no_treatment_label: Option<String>,
    #[serde(default)]
    area_separator: Option<String>,
}

impl From<JsReportConfig> for ReportConfig {
    fn from(cfg: JsReportConfig) -> Self {
        let mut base = ReportConfig::default();
        if let Some(week_start) = cfg.week_start {
            base.week_start = week_start;
        }
        if let Some(label) = cfg.no_treatment_label {
            base.no_treatment_label = label;
        }
        if let Some(separator) = cfg.area_separator {
            base.area_separator = separator;
        }
        base
    }
}

/// Tính toàn bộ báo cáo. `now` là chuỗi ISO (`2024-01-10` hoặc `2024-01-10T09:00:00`).
#[wasm_bindgen]
pub fn compute_report(
    entries: JsValue,
    range: &str,
    now: &str,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let entries_value = from_value::<serde_json::Value>(entries)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được danh sách bản ghi: {err}")))?;

    let range: RangeSelector = range
        .parse()
        .map_err(|err| JsValue::from_str(&format_report_error(err)))?;

    let now = painlog_report::parse_reference_instant(now)
        .map_err(|err| JsValue::from_str(&format_report_error(err)))?;

    let cfg = read_config(config)?;

    let report = painlog_report::summarize_entries_value(&entries_value, range, now, &cfg)
        .map_err(|err| JsValue::from_str(&format_report_error(err)))?;

    to_value(&report).map_err(|err| JsValue::from_str(&format!("Không serialize báo cáo: {err}")))
}

/// Tóm tắt trong ngày cho màn hình chính. `date` có dạng `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn day_summary(
    entries: JsValue,
    date: &str,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let entries_value = from_value::<serde_json::Value>(entries)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được danh sách bản ghi: {err}")))?;

    let date = painlog_report::parse_reference_instant(date)
        .map_err(|err| JsValue::from_str(&format_report_error(err)))?
        .date();

    let cfg = read_config(config)?;

    let summary = painlog_report::summarize_day_value(&entries_value, date, &cfg)
        .map_err(|err| JsValue::from_str(&format_report_error(err)))?;

    to_value(&summary)
        .map_err(|err| JsValue::from_str(&format!("Không serialize tóm tắt: {err}")))
}

fn read_config(config: Option<JsValue>) -> Result<ReportConfig, JsValue> {
    match config {
        Some(js_cfg) => {
            let cfg: JsReportConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(ReportConfig::from(cfg))
        }
        None => Ok(ReportConfig::default()),
    }
}

/// Danh sách khoảng thời gian cho bộ chọn trên giao diện.
#[wasm_bindgen]
pub fn range_options() -> Vec<JsValue> {
    RangeSelector::ALL
        .into_iter()
        .map(|range| JsValue::from_str(range.as_str()))
        .collect()
}

fn format_report_error(err: ReportError) -> String {
    format!("Report error: {err}")
}
