use crate::reporting;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tally_domain::entities::summary::ProfitSummary;
use tally_domain::repositories::artifacts::ArtifactWriter;
use tally_domain::services::batch::BatchReport;
use tally_domain::services::overlay::SymbolOverlay;
use tally_domain::services::profit::DailyProfit;
use tally_domain::value_objects::equity_point::EquityPoint;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemArtifactWriter;

impl FilesystemArtifactWriter {
    pub fn new() -> Self {
        Self
    }
}

fn record_write_metrics<T>(kind: &'static str, start: Instant, result: &Result<T, String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "tally.infra.artifacts.write.calls_total",
        "kind" => kind,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("tally.infra.artifacts.write_ms", "kind" => kind, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

impl ArtifactWriter for FilesystemArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        let start = Instant::now();
        let result = fs::create_dir_all(path)
            .map_err(|err| format!("failed to create dir {}: {}", path.display(), err));
        record_write_metrics("ensure_dir", start, &result);
        result
    }

    fn clear_dir(&self, path: &Path) -> Result<usize, String> {
        let start = Instant::now();
        let result = reporting::clear_dir(path);
        record_write_metrics("clear_dir", start, &result);
        result
    }

    fn write_daily_csv(&self, path: &Path, daily: &DailyProfit) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_daily_csv(path, daily);
        record_write_metrics("daily_csv", start, &result);
        result
    }

    fn write_equity_csv(&self, path: &Path, points: &[EquityPoint]) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_equity_csv(path, points);
        record_write_metrics("equity_csv", start, &result);
        result
    }

    fn write_summary_json(
        &self,
        path: &Path,
        summary: &ProfitSummary,
        meta: Option<&serde_json::Value>,
    ) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_summary_json(path, summary, meta);
        record_write_metrics("summary_json", start, &result);
        result
    }

    fn write_equity_chart_html(
        &self,
        path: &Path,
        summary: &ProfitSummary,
        points: &[EquityPoint],
    ) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_equity_chart_html(path, summary, points);
        record_write_metrics("equity_html", start, &result);
        result
    }

    fn write_overlay_html(&self, path: &Path, overlay: &SymbolOverlay) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_overlay_html(path, overlay);
        record_write_metrics("overlay_html", start, &result);
        result
    }

    fn write_batch_report_json(&self, path: &Path, report: &BatchReport) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_batch_report_json(path, report);
        record_write_metrics("batch_report_json", start, &result);
        result
    }
}
