//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for dcavest.
#[derive(Debug, thiserror::Error)]
pub enum DcaError {
    #[error("invalid date range: start {start} must be before end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid investment amount {amount}: must be a positive number")]
    InvalidAmount { amount: f64 },

    #[error("no price available for {symbol}: price series is empty")]
    NoPriceAvailable { symbol: String },

    #[error("division undefined: {what} is zero")]
    DivisionUndefined { what: String },

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

    #[error("price data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DcaError> for std::process::ExitCode {
    fn from(err: &DcaError) -> Self {
        let code: u8 = match err {
            DcaError::Io(_) => 1,
            DcaError::ConfigParse { .. }
            | DcaError::ConfigMissing { .. }
            | DcaError::ConfigInvalid { .. } => 2,
            DcaError::Data { .. } | DcaError::NoPriceAvailable { .. } => 3,
            DcaError::InvalidDateRange { .. } | DcaError::InvalidAmount { .. } => 4,
            DcaError::DivisionUndefined { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
