//! Domain error types.

use std::fmt;

/// Which timestamp of a trade failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampField {
    Timestamp,
    ExitTimestamp,
}

impl fmt::Display for TimestampField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampField::Timestamp => write!(f, "timestamp"),
            TimestampField::ExitTimestamp => write!(f, "exit_timestamp"),
        }
    }
}

/// A trade whose timestamp could not be parsed. The trade is left out of
/// date-ordered views instead of failing the whole computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize)]
#[error("malformed {field} on trade {trade_id}: {value:?}")]
pub struct MalformedTimestamp {
    pub trade_id: String,
    pub field: TimestampField,
    pub value: String,
}

/// Top-level error type for tradescope.
#[derive(Debug, thiserror::Error)]
pub enum TradescopeError {
    #[error("trade source error: {reason}")]
    TradeSource { reason: String },

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

    #[error("{count} trade record(s) failed validation")]
    InvalidTrades { count: usize },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradescopeError> for std::process::ExitCode {
    fn from(err: &TradescopeError) -> Self {
        let code: u8 = match err {
            TradescopeError::Io(_) | TradescopeError::Report { .. } => 1,
            TradescopeError::ConfigParse { .. }
            | TradescopeError::ConfigMissing { .. }
            | TradescopeError::ConfigInvalid { .. } => 2,
            TradescopeError::TradeSource { .. } => 3,
            TradescopeError::InvalidTrades { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
