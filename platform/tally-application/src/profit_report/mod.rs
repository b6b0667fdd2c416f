use crate::config::Config;
use crate::shared::{config_snapshot_json, summary_meta_json};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tally_domain::entities::summary::{summarize, ProfitSummary};
use tally_domain::repositories::artifacts::ArtifactWriter;
use tally_domain::repositories::trades::{TradeQuery, TradeSource};
use tally_domain::services::profit::ProfitEngine;
use tracing::{info, info_span, warn};

pub struct ProfitReportResult {
    pub run_dir: PathBuf,
    pub summary: ProfitSummary,
    pub wrote_html: bool,
}

/// Loads the trades, runs the profit engine and writes `daily.csv`, `equity.csv`,
/// `summary.json` (and `equity.html` when enabled) into `<out>/<run_id>/`.
pub fn generate_profit_report(
    config: &Config,
    out: Option<&Path>,
    source: &dyn TradeSource,
    writer: &dyn ArtifactWriter,
) -> Result<ProfitReportResult, String> {
    let _span = info_span!(
        "generate_profit_report",
        run_id = %config.run.run_id,
        profit_mode = config.run.profit_mode.label()
    )
    .entered();

    let stage_start = Instant::now();
    let batch = source.load_trades(&TradeQuery {
        path: config.paths.trades_path(),
    })?;
    metrics::histogram!("tally.profit.load_trades_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    metrics::gauge!("tally.profit.records").set(batch.len() as f64);

    let engine_start = Instant::now();
    let run = ProfitEngine::new(config.run.profit_mode).run(&batch);
    metrics::histogram!("tally.profit.engine_ms")
        .record(engine_start.elapsed().as_millis() as f64);

    if run.dropped_legs > 0 {
        warn!(
            dropped_legs = run.dropped_legs,
            "unpaired trailing legs were dropped"
        );
    }
    if run.side_mismatches > 0 {
        warn!(
            side_mismatches = run.side_mismatches,
            "positional pairs do not alternate buy/sell"
        );
    }
    if let Err(err) = &run.drawdown {
        warn!(kind = err.kind(), error = %err, "pairwise drawdown is undefined");
    }

    let summary = summarize(&run, config.run.initial_capital);
    metrics::gauge!("tally.profit.round_trips").set(summary.round_trips as f64);
    metrics::gauge!("tally.profit.trading_days").set(summary.trading_days as f64);

    let run_dir = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.paths.out_dir())
        .join(&config.run.run_id);
    writer.ensure_dir(&run_dir)?;
    writer.write_daily_csv(run_dir.join("daily.csv").as_path(), &run.daily)?;
    writer.write_equity_csv(run_dir.join("equity.csv").as_path(), &run.equity)?;

    let mut meta = summary_meta_json(config, &summary);
    if let Some(obj) = meta.as_object_mut() {
        obj.insert("config_snapshot".to_string(), config_snapshot_json(config));
        obj.insert("records".to_string(), serde_json::json!(batch.len()));
        obj.insert("record_shape".to_string(), serde_json::json!(batch.shape()));
        obj.insert("dropped_legs".to_string(), serde_json::json!(run.dropped_legs));
        obj.insert(
            "side_mismatches".to_string(),
            serde_json::json!(run.side_mismatches),
        );
    }
    writer.write_summary_json(run_dir.join("summary.json").as_path(), &summary, Some(&meta))?;

    let wrote_html = config.html_enabled();
    if wrote_html {
        writer.write_equity_chart_html(
            run_dir.join("equity.html").as_path(),
            &summary,
            &run.equity,
        )?;
    }

    metrics::histogram!("tally.profit.generate_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    info!(
        run_dir = %run_dir.display(),
        round_trips = summary.round_trips,
        total_profit = summary.total_profit,
        "profit report written"
    );

    Ok(ProfitReportResult {
        run_dir,
        summary,
        wrote_html,
    })
}
