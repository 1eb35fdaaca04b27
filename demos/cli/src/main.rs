use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use painlog_core::{RangeSelector, ReportBundle, ReportConfig};
use painlog_report::{parse_entries_str, parse_reference_instant, summarize_entries_str};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "painlog-cli",
    about = "Tạo báo cáo xu hướng đau từ file JSON nhật ký BPI."
)]
struct Args {
    /// Đường dẫn tới file JSON (mảng các bản ghi `pain_entries`).
    #[arg(short, long)]
    input: PathBuf,

    /// Khoảng thời gian: "Last 7 days", "Last month", "Last year", "All time".
    #[arg(short, long, default_value = "Last 7 days")]
    range: String,

    /// Thời điểm tham chiếu (YYYY-MM-DD hoặc YYYY-MM-DDTHH:MM:SS), mặc định là bây giờ.
    #[arg(long)]
    now: Option<String>,

    /// Chỉ in tóm tắt của một ngày (YYYY-MM-DD) thay cho báo cáo.
    #[arg(long)]
    day: Option<String>,

    /// File cấu hình TOML.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// In toàn bộ báo cáo dưới dạng JSON.
    #[arg(long)]
    json: bool,

    /// Mức log khi không đặt RUST_LOG.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReportConfig::default(),
    };

    if let Some(day) = args.day.as_deref() {
        let date = parse_reference_instant(day)?.date();
        let entries = parse_entries_str(&data, &config)
            .with_context(|| format!("Không đọc được bản ghi từ {:?}", args.input))?;
        let summary = painlog_report::day_summary(&entries, date);
        tracing::info!(input = ?args.input, date = %date, count = summary.entry_count, "Generated day summary");

        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{}: {}", summary.date, summary.message());
        }
        return Ok(());
    }

    let range: RangeSelector = args.range.parse()?;
    let now = match args.now.as_deref() {
        Some(value) => parse_reference_instant(value)?,
        None => Local::now().naive_local(),
    };

    tracing::info!(input = ?args.input, range = %range, now = %now, "Generating pain report");

    let report = summarize_entries_str(&data, range, now, &config)
        .with_context(|| format!("Không tạo được báo cáo từ {:?}", args.input))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<ReportConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
    let config: ReportConfig =
        toml::from_str(&text).with_context(|| format!("Cấu hình không hợp lệ: {path:?}"))?;
    config.validate()?;
    Ok(config)
}

fn print_summary(report: &ReportBundle) {
    if !report.has_entries {
        println!("No data found. Please create an entry first.");
        return;
    }

    let metrics = &report.current_metrics;
    println!("{} Comparison ({})", report.period_label, report.range);
    println!(
        "Average pain score: {} ({})",
        metrics
            .average_pain
            .map(|value| format!("{value:.2}"))
            .unwrap_or_else(|| "No data".to_string()),
        report.deltas.pain.display
    );
    println!(
        "Most painful area: {}{}",
        metrics.most_painful_area.as_deref().unwrap_or("No data"),
        report
            .deltas
            .area
            .label()
            .map(|label| format!(" ({label})"))
            .unwrap_or_default()
    );
    println!("Entries in range: {}", metrics.entry_count);

    println!("\n{} Trends", report.period_label);
    if report.trend_series.is_empty() {
        println!("  No data available for this range");
    }
    for point in &report.trend_series {
        println!(
            "  {:<10} worst {:>5}  least {:>5}  average {:>5}",
            point.label,
            format_score(point.worst_pain),
            format_score(point.least_pain),
            format_score(point.average_pain)
        );
    }

    println!("\n{} Pain Interference", report.period_label);
    for row in &report.interference_series {
        println!("  {:<18} {:>5}", row.label, format_score(row.score));
    }

    println!("\nTreatment Comparison");
    for row in &report.treatment_series {
        println!(
            "  {:<18} {:>5}",
            row.treatment,
            format_score(row.average_pain)
        );
    }
}

fn format_score(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "-".to_string())
}
