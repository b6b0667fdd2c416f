use std::path::PathBuf;

pub(super) fn run_validate(
    config_path: PathBuf,
    strict: bool,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let config = tally_application::config::load_config(&config_path)?;
    super::common::print_config_summary("validate", &config, None);

    let crate::infra::ValidateDeps { trades, catalog } = crate::infra::build_validate_deps();
    let report = tally_application::validation::validate(
        &config,
        strict,
        trades.as_ref(),
        catalog.as_ref(),
    )?;

    let pretty = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("failed to serialize validation report: {err}"))?;
    match out {
        Some(out_path) => std::fs::write(&out_path, pretty)
            .map_err(|err| format!("failed to write report {}: {}", out_path.display(), err))?,
        None => println!("{pretty}"),
    }

    Ok(())
}
