use crate::entities::summary::ProfitSummary;
use crate::services::batch::BatchReport;
use crate::services::overlay::SymbolOverlay;
use crate::services::profit::DailyProfit;
use crate::value_objects::equity_point::EquityPoint;
use std::path::Path;

pub trait ArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String>;
    /// Removes every file directly inside `path`, keeping the directory. Returns how many
    /// files were removed.
    fn clear_dir(&self, path: &Path) -> Result<usize, String>;
    fn write_daily_csv(&self, path: &Path, daily: &DailyProfit) -> Result<(), String>;
    fn write_equity_csv(&self, path: &Path, points: &[EquityPoint]) -> Result<(), String>;
    fn write_summary_json(
        &self,
        path: &Path,
        summary: &ProfitSummary,
        meta: Option<&serde_json::Value>,
    ) -> Result<(), String>;
    fn write_equity_chart_html(
        &self,
        path: &Path,
        summary: &ProfitSummary,
        points: &[EquityPoint],
    ) -> Result<(), String>;
    fn write_overlay_html(&self, path: &Path, overlay: &SymbolOverlay) -> Result<(), String>;
    fn write_batch_report_json(&self, path: &Path, report: &BatchReport) -> Result<(), String>;
}
