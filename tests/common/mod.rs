#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tradescope::domain::analytics::AnalyticsReport;
use tradescope::domain::calendar::CalendarPolicy;
use tradescope::domain::error::TradescopeError;
use tradescope::domain::performance::PerformanceSnapshot;
pub use tradescope::domain::trade::{Side, TradeRecord, TradeStatus};
use tradescope::ports::report_port::ReportPort;
use tradescope::ports::trade_port::TradePort;

pub struct MockTradePort {
    pub trades: Vec<TradeRecord>,
    pub performance: Option<PerformanceSnapshot>,
    pub error: Option<String>,
}

impl MockTradePort {
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            performance: None,
            error: None,
        }
    }

    pub fn with_trades(mut self, trades: Vec<TradeRecord>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_performance(mut self, performance: PerformanceSnapshot) -> Self {
        self.performance = Some(performance);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl TradePort for MockTradePort {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, TradescopeError> {
        if let Some(reason) = &self.error {
            return Err(TradescopeError::TradeSource {
                reason: reason.clone(),
            });
        }
        Ok(self.trades.clone())
    }

    fn fetch_performance(&self) -> Result<Option<PerformanceSnapshot>, TradescopeError> {
        Ok(self.performance.clone())
    }
}

pub struct MockReportPort {
    pub calls: RefCell<Vec<(AnalyticsReport, PathBuf)>>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, report: &AnalyticsReport, output_path: &Path) -> Result<(), TradescopeError> {
        self.calls
            .borrow_mut()
            .push((report.clone(), output_path.to_path_buf()));
        Ok(())
    }
}

pub fn utc() -> CalendarPolicy {
    CalendarPolicy::utc()
}

pub fn perf(current_balance: f64, total_pnl: f64) -> PerformanceSnapshot {
    PerformanceSnapshot {
        current_balance,
        total_pnl,
        ..Default::default()
    }
}

pub fn open_trade(id: &str, symbol: &str, timestamp: &str) -> TradeRecord {
    TradeRecord {
        id: id.to_string(),
        symbol: symbol.to_string(),
        side: Side::Long,
        entry_price: 100.0,
        quantity: 1.0,
        leverage: 5.0,
        stop_loss_pct: 2.0,
        take_profit_pct: 4.0,
        current_roe: 0.0,
        max_roe: 0.0,
        drawdown: 0.0,
        status: TradeStatus::Open,
        timestamp: timestamp.to_string(),
        exit_price: None,
        exit_timestamp: None,
        actual_return_pct: None,
        notes: String::new(),
    }
}

/// A closed trade opened at `timestamp` and exited at `exit_timestamp`.
pub fn closed_trade(
    id: &str,
    symbol: &str,
    return_pct: f64,
    timestamp: &str,
    exit_timestamp: &str,
) -> TradeRecord {
    let status = if return_pct >= 0.0 {
        TradeStatus::ClosedWin
    } else {
        TradeStatus::ClosedLoss
    };
    TradeRecord {
        status,
        exit_price: Some(100.0 * (1.0 + return_pct / 100.0)),
        exit_timestamp: Some(exit_timestamp.to_string()),
        actual_return_pct: Some(return_pct),
        ..open_trade(id, symbol, timestamp)
    }
}

pub const TRADES_CSV_HEADER: &str = "id,symbol,side,entry_price,quantity,leverage,stop_loss_pct,take_profit_pct,current_roe,max_roe,drawdown,status,timestamp,exit_price,exit_timestamp,actual_return_pct,notes\n";

pub fn trades_csv(rows: &[&str]) -> String {
    let mut content = TRADES_CSV_HEADER.to_string();
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content
}
