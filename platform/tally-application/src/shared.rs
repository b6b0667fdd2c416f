use crate::config::Config;
use crate::meta::{engine_name, engine_version};
use tally_domain::entities::summary::ProfitSummary;

pub fn summary_meta_json(config: &Config, summary: &ProfitSummary) -> serde_json::Value {
    serde_json::json!({
        "engine": engine_name(),
        "version": engine_version(),
        "run_id": config.run.run_id,
        "profit_mode": summary.profit_mode,
        "initial_capital": config.run.initial_capital,
        "start": summary.first_day.map(|d| d.to_string()),
        "end": summary.last_day.map(|d| d.to_string()),
    })
}

pub fn config_snapshot_json(config: &Config) -> serde_json::Value {
    serde_json::json!({
        "run": {
            "run_id": config.run.run_id,
            "profit_mode": config.run.profit_mode.label(),
            "initial_capital": config.run.initial_capital,
        },
        "paths": {
            "trades": config.paths.trades_path().display().to_string(),
            "history_dir": config.paths.history_dir().display().to_string(),
            "graphs_dir": config.paths.graphs_dir().display().to_string(),
            "out_dir": config.paths.out_dir().display().to_string(),
        },
        "markets": config.markets.markets,
        "report": {
            "html": config.html_enabled(),
        },
        "charts": {
            "clear_before_render": config.clear_before_render(),
        },
    })
}
