use std::path::PathBuf;
use tally_application::overlays::{render_symbol_overlays, OverlayDeps};

pub(super) fn run_charts(config_path: PathBuf) -> Result<(), String> {
    let config = tally_application::config::load_config(&config_path)?;
    super::common::print_config_summary("charts", &config, None);

    let crate::infra::ChartDeps {
        catalog,
        history,
        trades,
        artifacts,
    } = crate::infra::build_chart_deps();
    let result = render_symbol_overlays(
        &config,
        OverlayDeps {
            catalog: catalog.as_ref(),
            history: history.as_ref(),
            trades: trades.as_ref(),
            writer: artifacts.as_ref(),
        },
    )?;

    println!(
        "charts: rendered={}, skipped={}, failed={}, cleared={} -> {}",
        result.report.rendered(),
        result.report.skipped(),
        result.report.failed(),
        result.cleared,
        result.graphs_dir.display()
    );
    for (symbol, error) in result.report.failures() {
        println!("  failed {symbol}: {error}");
    }
    Ok(())
}
