//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for rsirev.
#[derive(Debug, thiserror::Error)]
pub enum RsirevError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    DataParse { reason: String },

    #[error("price dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedPrices { previous: NaiveDate, next: NaiveDate },

    #[error("insufficient data: have {bars} bars, RSI({period}) produced no tradable periods")]
    InsufficientData { bars: usize, period: usize },

    #[error("cannot compute metrics on an empty return series")]
    EmptyReturns,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RsirevError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        RsirevError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&RsirevError> for std::process::ExitCode {
    fn from(err: &RsirevError) -> Self {
        let code: u8 = match err {
            RsirevError::Io(_) => 1,
            RsirevError::ConfigParse { .. }
            | RsirevError::ConfigMissing { .. }
            | RsirevError::ConfigInvalid { .. } => 2,
            RsirevError::DataParse { .. } | RsirevError::UnorderedPrices { .. } => 3,
            RsirevError::InsufficientData { .. } | RsirevError::EmptyReturns => 5,
        };
        std::process::ExitCode::from(code)
    }
}
