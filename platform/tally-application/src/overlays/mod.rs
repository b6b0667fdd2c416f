use crate::config::Config;
use std::path::PathBuf;
use std::time::Instant;
use tally_domain::repositories::artifacts::ArtifactWriter;
use tally_domain::repositories::price_history::{PriceHistoryQuery, PriceHistoryRepository};
use tally_domain::repositories::symbols::{SymbolCatalog, SymbolQuery};
use tally_domain::repositories::trades::{TradeQuery, TradeSource};
use tally_domain::services::batch::{BatchReport, OutcomeStatus};
use tally_domain::services::overlay::{build_overlay, overlay_file_name, trips_for_symbol};
use tally_domain::services::profit::ProfitEngine;
use tracing::{info, info_span, warn};

pub struct OverlayResult {
    pub graphs_dir: PathBuf,
    pub cleared: usize,
    pub report: BatchReport,
}

pub struct OverlayDeps<'a> {
    pub catalog: &'a dyn SymbolCatalog,
    pub history: &'a dyn PriceHistoryRepository,
    pub trades: &'a dyn TradeSource,
    pub writer: &'a dyn ArtifactWriter,
}

/// Renders one price/trade overlay per catalogued symbol into the graphs directory.
///
/// Catalog and trade loading failures abort the batch. Anything that goes wrong for a single
/// symbol is recorded as a failed outcome in the returned report and written to
/// `batch_report.json`.
pub fn render_symbol_overlays(
    config: &Config,
    deps: OverlayDeps<'_>,
) -> Result<OverlayResult, String> {
    let _span = info_span!(
        "render_symbol_overlays",
        run_id = %config.run.run_id,
        markets = ?config.markets.markets
    )
    .entered();

    let stage_start = Instant::now();
    let symbols = deps.catalog.list_symbols(&SymbolQuery {
        base_dir: PathBuf::from(&config.paths.base_dir),
        markets: config.markets.markets.clone(),
    })?;
    let batch = deps.trades.load_trades(&TradeQuery {
        path: config.paths.trades_path(),
    })?;
    let run = ProfitEngine::new(config.run.profit_mode).run(&batch);

    let graphs_dir = config.paths.graphs_dir();
    deps.writer.ensure_dir(&graphs_dir)?;
    let cleared = if config.clear_before_render() {
        deps.writer.clear_dir(&graphs_dir)?
    } else {
        0
    };

    let history_dir = config.paths.history_dir();
    let mut report = BatchReport::default();
    for symbol in &symbols {
        let trips = trips_for_symbol(&run.round_trips, symbol);
        if trips.is_empty() {
            report.record(
                symbol,
                OutcomeStatus::Skipped {
                    reason: "no trades".to_string(),
                },
            );
            continue;
        }

        let status = deps
            .history
            .load_history(&PriceHistoryQuery {
                history_dir: history_dir.clone(),
                symbol: symbol.clone(),
            })
            .and_then(|prices| {
                let overlay = build_overlay(symbol, prices, &trips);
                let path = graphs_dir.join(overlay_file_name(symbol));
                deps.writer.write_overlay_html(&path, &overlay)?;
                Ok(OutcomeStatus::Rendered {
                    price_points: overlay.prices.len(),
                    round_trips: trips.len(),
                })
            })
            .unwrap_or_else(|error| {
                warn!(symbol = %symbol, error = %error, "overlay failed");
                metrics::counter!("tally.charts.failed").increment(1);
                OutcomeStatus::Failed { error }
            });
        report.record(symbol, status);
    }

    deps.writer
        .write_batch_report_json(graphs_dir.join("batch_report.json").as_path(), &report)?;

    metrics::histogram!("tally.charts.render_ms").record(stage_start.elapsed().as_millis() as f64);
    metrics::gauge!("tally.charts.rendered").set(report.rendered() as f64);
    info!(
        symbols = symbols.len(),
        rendered = report.rendered(),
        skipped = report.skipped(),
        failed = report.failed(),
        cleared,
        "overlay batch complete"
    );

    Ok(OverlayResult {
        graphs_dir,
        cleared,
        report,
    })
}
