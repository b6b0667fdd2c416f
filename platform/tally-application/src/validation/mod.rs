use crate::config::Config;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;
use tally_domain::repositories::symbols::{SymbolCatalog, SymbolQuery};
use tally_domain::repositories::trades::{TradeQuery, TradeSource};
use tally_domain::services::profit::ProfitEngine;
use tracing::info_span;

/// Checks that the configured inputs load and pair cleanly. In strict mode any dropped leg,
/// non-alternating pair, uncatalogued traded symbol or undefined drawdown is an error.
pub fn validate(
    config: &Config,
    strict: bool,
    trades: &dyn TradeSource,
    catalog: &dyn SymbolCatalog,
) -> Result<serde_json::Value, String> {
    let _span = info_span!("validate", strict = strict, run_id = %config.run.run_id).entered();

    let stage_start = Instant::now();
    let symbols = catalog.list_symbols(&SymbolQuery {
        base_dir: PathBuf::from(&config.paths.base_dir),
        markets: config.markets.markets.clone(),
    })?;
    let batch = trades.load_trades(&TradeQuery {
        path: config.paths.trades_path(),
    })?;
    let run = ProfitEngine::new(config.run.profit_mode).run(&batch);
    metrics::histogram!("tally.validate.load_ms").record(stage_start.elapsed().as_millis() as f64);

    let catalogued: BTreeSet<&str> = symbols.iter().map(String::as_str).collect();
    let uncatalogued: BTreeSet<&str> = run
        .round_trips
        .iter()
        .map(|trip| trip.symbol.as_str())
        .filter(|symbol| !catalogued.contains(symbol))
        .collect();

    let drawdown_error = run.drawdown.as_ref().err().map(|err| err.to_string());

    let report = serde_json::json!({
        "run_id": config.run.run_id,
        "strict": strict,
        "records": batch.len(),
        "record_shape": batch.shape(),
        "round_trips": run.round_trips.len(),
        "dropped_legs": run.dropped_legs,
        "side_mismatches": run.side_mismatches,
        "trading_days": run.daily.len(),
        "catalogued_symbols": symbols.len(),
        "uncatalogued_symbols": uncatalogued.iter().collect::<Vec<_>>(),
        "drawdown_error": drawdown_error,
    });

    if strict {
        let mut problems = Vec::new();
        if run.dropped_legs > 0 {
            problems.push(format!("{} unpaired legs dropped", run.dropped_legs));
        }
        if run.side_mismatches > 0 {
            problems.push(format!(
                "{} pairs are not buy followed by sell",
                run.side_mismatches
            ));
        }
        if !uncatalogued.is_empty() {
            problems.push(format!(
                "{} traded symbols missing from catalog",
                uncatalogued.len()
            ));
        }
        if let Some(err) = &drawdown_error {
            problems.push(err.clone());
        }
        if !problems.is_empty() {
            return Err(format!("strict validation failed: {}", problems.join("; ")));
        }
    }

    Ok(report)
}
