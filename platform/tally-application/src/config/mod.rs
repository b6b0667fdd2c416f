use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_domain::value_objects::profit_mode::ProfitMode;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub run: RunConfig,
    pub paths: PathsConfig,
    pub markets: MarketsConfig,
    pub report: Option<ReportConfig>,
    pub charts: Option<ChartsConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub run_id: String,
    #[serde(default)]
    pub profit_mode: ProfitMode,
    pub initial_capital: Option<f64>,
}

/// Filesystem layout. Relative entries resolve against `base_dir`.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    pub base_dir: String,
    pub trades_file: String,
    pub history_dir: String,
    pub graphs_dir: String,
    pub out_dir: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct MarketsConfig {
    pub markets: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub html: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChartsConfig {
    pub clear_before_render: Option<bool>,
}

impl PathsConfig {
    pub fn resolve(&self, entry: &str) -> PathBuf {
        let path = Path::new(entry);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.base_dir).join(path)
        }
    }

    pub fn trades_path(&self) -> PathBuf {
        self.resolve(&self.trades_file)
    }

    pub fn history_dir(&self) -> PathBuf {
        self.resolve(&self.history_dir)
    }

    pub fn graphs_dir(&self) -> PathBuf {
        self.resolve(&self.graphs_dir)
    }

    pub fn out_dir(&self) -> PathBuf {
        self.resolve(&self.out_dir)
    }
}

impl Config {
    pub fn html_enabled(&self) -> bool {
        self.report
            .as_ref()
            .and_then(|report| report.html)
            .unwrap_or(false)
    }

    pub fn clear_before_render(&self) -> bool {
        self.charts
            .as_ref()
            .and_then(|charts| charts.clear_before_render)
            .unwrap_or(true)
    }
}

pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.run.run_id.trim().is_empty() {
        return Err("run.run_id must not be empty".to_string());
    }
    if let Some(capital) = config.run.initial_capital {
        if !capital.is_finite() || capital <= 0.0 {
            return Err("run.initial_capital must be finite and > 0".to_string());
        }
    }
    if config.markets.markets.is_empty() {
        return Err("markets.markets must list at least one market".to_string());
    }
    if let Some(blank) = config
        .markets
        .markets
        .iter()
        .position(|market| market.trim().is_empty())
    {
        return Err(format!("markets.markets[{blank}] must not be empty"));
    }
    if config.paths.trades_file.trim().is_empty() {
        return Err("paths.trades_file must not be empty".to_string());
    }
    Ok(())
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    validate_config(&config)?;
    Ok((config, contents))
}

#[cfg(test)]
mod tests {
    use super::{load_config, validate_config, Config};
    use std::path::{Path, PathBuf};
    use tally_domain::value_objects::profit_mode::ProfitMode;

    const MINIMAL: &str = r#"
[run]
run_id = "nz_2015_2020"
initial_capital = 1000.0

[paths]
base_dir = "assets/"
trades_file = "trades.json"
history_dir = "history"
graphs_dir = "graphs"
out_dir = "runs/"

[markets]
markets = ["nz", "us"]
"#;

    fn parse_config(toml_str: &str) -> Config {
        toml::from_str(toml_str).expect("config should parse")
    }

    #[test]
    fn parse_minimal_config() {
        let config = parse_config(MINIMAL);
        assert_eq!(config.run.run_id, "nz_2015_2020");
        assert_eq!(config.run.profit_mode, ProfitMode::Absolute);
        assert_eq!(config.markets.markets, vec!["nz", "us"]);
        assert!(!config.html_enabled());
        assert!(config.clear_before_render());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn parse_percent_change_mode() {
        let toml_str = MINIMAL.replace(
            "initial_capital = 1000.0",
            "initial_capital = 1000.0\nprofit_mode = \"percent_change\"",
        );
        let config = parse_config(&toml_str);
        assert_eq!(config.run.profit_mode, ProfitMode::PercentChange);
    }

    #[test]
    fn parse_profit_mode_alias() {
        let toml_str = MINIMAL.replace(
            "initial_capital = 1000.0",
            "initial_capital = 1000.0\nprofit_mode = \"pct\"",
        );
        let config = parse_config(&toml_str);
        assert_eq!(config.run.profit_mode, ProfitMode::PercentChange);
        assert_eq!(config.run.profit_mode.label(), "percent_change");
    }

    #[test]
    fn paths_resolve_against_base_dir() {
        let config = parse_config(MINIMAL);
        assert_eq!(
            config.paths.trades_path(),
            PathBuf::from("assets/").join("trades.json")
        );
        assert_eq!(
            config.paths.resolve("/abs/graphs"),
            PathBuf::from("/abs/graphs")
        );
    }

    #[test]
    fn parse_config_rejects_unknown_fields() {
        let toml_str = format!("{MINIMAL}\nunknown_field = 123\n");
        let err = toml::from_str::<Config>(&toml_str).expect_err("unknown field should fail");
        assert!(err.to_string().to_lowercase().contains("unknown field"));
    }

    #[test]
    fn validate_rejects_empty_markets() {
        let toml_str = MINIMAL.replace("markets = [\"nz\", \"us\"]", "markets = []");
        let config = parse_config(&toml_str);
        let err = validate_config(&config).expect_err("no markets");
        assert!(err.contains("at least one market"));
    }

    #[test]
    fn validate_rejects_non_positive_capital() {
        let toml_str = MINIMAL.replace("initial_capital = 1000.0", "initial_capital = 0.0");
        let config = parse_config(&toml_str);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn load_config_missing_file_returns_error() {
        let path = Path::new("/tmp/tally-missing-config.toml");
        let err = load_config(path).expect_err("expected load to fail");
        assert!(err.contains("failed to read config"));
    }
}
