//! JSON trade history adapter.
//!
//! Accepts either a bare array of trades or the dashboard export shape
//! `{ "trades": [...], "performance": {...} }`.

use crate::domain::error::TradescopeError;
use crate::domain::performance::PerformanceSnapshot;
use crate::domain::trade::TradeRecord;
use crate::ports::trade_port::TradePort;
use serde::Deserialize;
use std::cell::OnceCell;
use std::fs;
use std::path::PathBuf;

type Loaded = (Vec<TradeRecord>, Option<PerformanceSnapshot>);

#[derive(Debug, Deserialize)]
struct JsonExport {
    trades: Vec<TradeRecord>,
    #[serde(default)]
    performance: Option<PerformanceSnapshot>,
}

/// Reads the file once; trades and the snapshot always come from the same
/// read.
pub struct JsonTradeAdapter {
    path: PathBuf,
    loaded: OnceCell<Loaded>,
}

impl JsonTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            loaded: OnceCell::new(),
        }
    }

    pub fn parse(
        content: &str,
    ) -> Result<(Vec<TradeRecord>, Option<PerformanceSnapshot>), TradescopeError> {
        let parse_error = |e: serde_json::Error| TradescopeError::TradeSource {
            reason: format!("JSON parse error: {}", e),
        };
        match content.trim_start().chars().next() {
            Some('[') => Ok((serde_json::from_str(content).map_err(parse_error)?, None)),
            Some('{') => {
                let export: JsonExport = serde_json::from_str(content).map_err(parse_error)?;
                Ok((export.trades, export.performance))
            }
            _ => Err(TradescopeError::TradeSource {
                reason: "JSON parse error: expected an array of trades or an object with \"trades\""
                    .to_string(),
            }),
        }
    }

    fn load(&self) -> Result<&Loaded, TradescopeError> {
        if let Some(loaded) = self.loaded.get() {
            return Ok(loaded);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| TradescopeError::TradeSource {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let parsed = Self::parse(&content)?;
        tracing::debug!(path = %self.path.display(), trades = parsed.0.len(), "loaded JSON trades");
        Ok(self.loaded.get_or_init(|| parsed))
    }
}

impl TradePort for JsonTradeAdapter {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, TradescopeError> {
        Ok(self.load()?.0.clone())
    }

    fn fetch_performance(&self) -> Result<Option<PerformanceSnapshot>, TradescopeError> {
        Ok(self.load()?.1.clone())
    }
}
