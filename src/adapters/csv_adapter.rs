//! CSV trade history adapter.
//!
//! Reads a trade export with one row per trade and a header naming the
//! columns. Empty cells count as absent; numeric cells that are empty or do
//! not parse fall back to zero, the same way the analytics treat them.

use crate::domain::error::TradescopeError;
use crate::domain::trade::{Side, TradeRecord, TradeStatus};
use crate::ports::trade_port::TradePort;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn parse(content: &str) -> Result<Vec<TradeRecord>, TradescopeError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut trades = Vec::new();

        for (row, result) in rdr.deserialize::<CsvTradeRow>().enumerate() {
            let record = result.map_err(|e| TradescopeError::TradeSource {
                reason: format!("CSV parse error at row {}: {}", row + 1, e),
            })?;
            trades.push(record.into_trade()?);
        }

        Ok(trades)
    }
}

impl TradePort for CsvTradeAdapter {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, TradescopeError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TradescopeError::TradeSource {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let trades = Self::parse(&content)?;
        tracing::debug!(path = %self.path.display(), trades = trades.len(), "loaded CSV trades");
        Ok(trades)
    }
}

/// One CSV row as written by the export, before defaults are applied.
#[derive(Debug, Deserialize)]
struct CsvTradeRow {
    id: String,
    symbol: String,
    side: String,
    #[serde(default)]
    entry_price: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
    #[serde(default)]
    leverage: Option<String>,
    #[serde(default)]
    stop_loss_pct: Option<String>,
    #[serde(default)]
    take_profit_pct: Option<String>,
    #[serde(default)]
    current_roe: Option<String>,
    #[serde(default)]
    max_roe: Option<String>,
    #[serde(default)]
    drawdown: Option<String>,
    status: String,
    timestamp: String,
    #[serde(default)]
    exit_price: Option<String>,
    #[serde(default)]
    exit_timestamp: Option<String>,
    #[serde(default)]
    actual_return_pct: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl CsvTradeRow {
    fn into_trade(self) -> Result<TradeRecord, TradescopeError> {
        let side = match self.side.to_uppercase().as_str() {
            "LONG" => Side::Long,
            "SHORT" => Side::Short,
            other => {
                return Err(TradescopeError::TradeSource {
                    reason: format!("trade {}: invalid side {:?}", self.id, other),
                });
            }
        };
        let status = match self.status.to_uppercase().as_str() {
            "OPEN" => TradeStatus::Open,
            "CLOSED_WIN" => TradeStatus::ClosedWin,
            "CLOSED_LOSS" => TradeStatus::ClosedLoss,
            _ => TradeStatus::Unknown,
        };

        Ok(TradeRecord {
            side,
            status,
            entry_price: number_or_zero(self.entry_price.as_deref()),
            quantity: number_or_zero(self.quantity.as_deref()),
            leverage: number_or_zero(self.leverage.as_deref()),
            stop_loss_pct: number_or_zero(self.stop_loss_pct.as_deref()),
            take_profit_pct: number_or_zero(self.take_profit_pct.as_deref()),
            current_roe: number_or_zero(self.current_roe.as_deref()),
            max_roe: number_or_zero(self.max_roe.as_deref()),
            drawdown: number_or_zero(self.drawdown.as_deref()),
            exit_price: optional_number(self.exit_price.as_deref()),
            exit_timestamp: non_empty(self.exit_timestamp),
            actual_return_pct: optional_number(self.actual_return_pct.as_deref()),
            notes: self.notes.unwrap_or_default(),
            id: self.id,
            symbol: self.symbol,
            timestamp: self.timestamp,
        })
    }
}

fn optional_number(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn number_or_zero(cell: Option<&str>) -> f64 {
    optional_number(cell).unwrap_or(0.0)
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.trim().is_empty())
}
