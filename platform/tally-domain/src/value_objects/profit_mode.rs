use serde::{Deserialize, Serialize};

/// How a round trip's profit is measured.
///
/// `Absolute` is `sell * qty - buy * qty` in price units; `PercentChange` is
/// `(sell - buy) / buy * 100` and ignores quantity. The two are never mixed within a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitMode {
    #[default]
    #[serde(alias = "abs", alias = "pnl")]
    Absolute,
    #[serde(alias = "percent-change", alias = "percent", alias = "pct")]
    PercentChange,
}

impl ProfitMode {
    pub fn label(&self) -> &'static str {
        match self {
            ProfitMode::Absolute => "absolute",
            ProfitMode::PercentChange => "percent_change",
        }
    }
}
