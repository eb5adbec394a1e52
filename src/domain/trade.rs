//! Trade records as reported by the bot service.

use super::lenient;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

/// Lifecycle state of a trade. `Unknown` absorbs any status string the
/// service sends that is not one of the three known values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Open,
    ClosedWin,
    ClosedLoss,
    #[serde(other)]
    Unknown,
}

impl TradeStatus {
    pub fn is_closed(self) -> bool {
        matches!(self, TradeStatus::ClosedWin | TradeStatus::ClosedLoss)
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Open => write!(f, "OPEN"),
            TradeStatus::ClosedWin => write!(f, "CLOSED_WIN"),
            TradeStatus::ClosedLoss => write!(f, "CLOSED_LOSS"),
            TradeStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub symbol: String,
    pub side: Side,
    #[serde(default, deserialize_with = "lenient::number")]
    pub entry_price: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub leverage: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stop_loss_pct: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub take_profit_pct: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_roe: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_roe: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub drawdown: f64,
    pub status: TradeStatus,
    /// Open/record time, kept as the raw text the service sent.
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub exit_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub actual_return_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
}

impl TradeRecord {
    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    /// Realized return in percent, or 0 when absent or not a finite number.
    pub fn realized_return(&self) -> f64 {
        finite_or_zero(self.actual_return_pct)
    }

    /// The exit timestamp, treating an empty string the same as absent.
    pub fn exit_timestamp(&self) -> Option<&str> {
        self.exit_timestamp
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

pub(crate) fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
