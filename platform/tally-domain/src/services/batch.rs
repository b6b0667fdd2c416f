use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Rendered {
        price_points: usize,
        round_trips: usize,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolOutcome {
    pub symbol: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Per-symbol results of a batch. A failing symbol never aborts the batch; it is recorded here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<SymbolOutcome>,
}

impl BatchReport {
    pub fn record(&mut self, symbol: &str, status: OutcomeStatus) {
        self.outcomes.push(SymbolOutcome {
            symbol: symbol.to_string(),
            status,
        });
    }

    pub fn rendered(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Rendered { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Failed { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.status {
                OutcomeStatus::Failed { error } => Some((outcome.symbol.as_str(), error.as_str())),
                _ => None,
            })
    }

    fn count(&self, predicate: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}
