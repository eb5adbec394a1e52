//! Account performance snapshot supplied alongside the trade history.

use super::lenient;
use super::trade::finite_or_zero;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSnapshot {
    #[serde(deserialize_with = "lenient::number")]
    pub current_balance: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_pnl: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_pnl_pct: f64,
    #[serde(deserialize_with = "lenient::count")]
    pub winning_trades: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub losing_trades: u32,
    #[serde(deserialize_with = "lenient::number")]
    pub win_rate: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub avg_win: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub avg_loss: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub profit_factor: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub max_drawdown: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub sharpe_ratio: f64,
}

impl PerformanceSnapshot {
    /// Balance before any realized P&L: `current_balance - total_pnl`.
    pub fn starting_balance(&self) -> f64 {
        finite_or_zero(Some(self.current_balance)) - finite_or_zero(Some(self.total_pnl))
    }
}
