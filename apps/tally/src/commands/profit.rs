use std::path::PathBuf;

pub(super) fn run_profit(config_path: PathBuf, out: Option<PathBuf>) -> Result<(), String> {
    let config = tally_application::config::load_config(&config_path)?;
    super::common::print_config_summary("profit", &config, out.as_ref());

    let crate::infra::ProfitDeps { trades, artifacts } = crate::infra::build_profit_deps();
    let result = tally_application::profit_report::generate_profit_report(
        &config,
        out.as_deref(),
        trades.as_ref(),
        artifacts.as_ref(),
    )?;

    let summary = &result.summary;
    println!(
        "profit: round_trips={}, trading_days={}, total_profit={:.4}, win_rate={:.4}",
        summary.round_trips, summary.trading_days, summary.total_profit, summary.win_rate
    );
    match (&summary.pairwise_drawdown_pct, &summary.pairwise_drawdown_error) {
        (Some(pct), _) => println!("pairwise drawdown: {pct:.4}%"),
        (None, Some(err)) => println!("pairwise drawdown: undefined ({err})"),
        (None, None) => println!("pairwise drawdown: n/a"),
    }
    println!("max drawdown: {:.4}", summary.max_drawdown);
    if let Some(total) = summary.total_return_pct {
        println!(
            "return: total={:.4}%, annualized={}",
            total,
            summary
                .annualized_return_pct
                .map(|pct| format!("{pct:.4}%"))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }
    println!(
        "report written to {}{}",
        result.run_dir.display(),
        if result.wrote_html { " (with equity.html)" } else { "" }
    );
    Ok(())
}
