use thiserror::Error;

/// Failures raised by the profit engine and by the trade validation that feeds it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfitError {
    #[error("malformed trade at index {index}: {reason}")]
    MalformedTrade { index: usize, reason: String },
    #[error("unparsable date '{value}' (expected YYYY-MM-DD)")]
    UnparsableDate { value: String },
    #[error("drawdown is undefined: final equity is zero")]
    DivisionByZero,
    #[error("drawdown is undefined: equity curve is empty")]
    EmptyInput,
}

impl ProfitError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTrade {
            index,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedTrade { .. } => "malformed_trade",
            Self::UnparsableDate { .. } => "unparsable_date",
            Self::DivisionByZero => "division_by_zero",
            Self::EmptyInput => "empty_input",
        }
    }
}
