use std::path::PathBuf;
use tally_application::config::Config;
use tally_application::meta::engine_name;

pub(super) fn print_config_summary(command: &str, config: &Config, out: Option<&PathBuf>) {
    println!(
        "{} cli: {} (run_id={}, profit_mode={}, initial_capital={})",
        engine_name(),
        command,
        config.run.run_id,
        config.run.profit_mode.label(),
        config
            .run
            .initial_capital
            .map(|capital| capital.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!(
        "paths: trades={}, history_dir={}, graphs_dir={}, out_dir={}",
        config.paths.trades_path().display(),
        config.paths.history_dir().display(),
        config.paths.graphs_dir().display(),
        out.cloned()
            .unwrap_or_else(|| config.paths.out_dir())
            .display()
    );
    println!("markets: {}", config.markets.markets.join(","));
}
