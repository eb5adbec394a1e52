//! Trade analytics: equity curve, per-symbol statistics, daily P&L and the
//! win/loss distribution, all derived from a trade history and the current
//! performance snapshot.
//!
//! Every function here is pure. Numeric defects degrade to zero and an
//! absent snapshot or empty history yields empty views. Unparsable
//! timestamps only remove the offending trade from the date-ordered view
//! that needed the timestamp.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::calendar::CalendarPolicy;
use super::error::{MalformedTimestamp, TimestampField};
use super::performance::PerformanceSnapshot;
use super::trade::{Side, TradeRecord, TradeStatus};

pub const START_LABEL: &str = "Start";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub label: String,
    pub balance: f64,
    /// Change in balance produced by this step.
    pub pnl: f64,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolStat {
    pub symbol: String,
    pub wins: usize,
    pub losses: usize,
    /// Sum of realized return percentages.
    pub total_pnl: f64,
    pub total: usize,
    /// Percentage in `[0, 100]`.
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub pnl: f64,
    pub trades: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Distribution {
    pub wins: usize,
    pub losses: usize,
}

impl Distribution {
    pub fn total(&self) -> usize {
        self.wins + self.losses
    }
}

/// All four views computed together, along with the trades left out of the
/// date-ordered ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub equity_curve: Vec<EquityPoint>,
    pub symbols: Vec<SymbolStat>,
    pub daily: Vec<DailyPnl>,
    pub distribution: Distribution,
    pub skipped: Vec<MalformedTimestamp>,
}

impl AnalyticsReport {
    pub fn compute(
        trades: &[TradeRecord],
        performance: Option<&PerformanceSnapshot>,
        calendar: &CalendarPolicy,
    ) -> Self {
        let (equity_curve, mut skipped) = replay_equity(trades, performance, calendar);
        let (daily, daily_skipped) = bucket_daily(trades, calendar);
        skipped.extend(daily_skipped);

        let report = AnalyticsReport {
            equity_curve,
            symbols: compute_symbol_performance(trades),
            daily,
            distribution: compute_distribution(trades),
            skipped,
        };

        tracing::debug!(
            trades = trades.len(),
            equity_points = report.equity_curve.len(),
            symbols = report.symbols.len(),
            days = report.daily.len(),
            skipped = report.skipped.len(),
            "computed trade analytics"
        );
        report
    }

    /// Balance after the last replayed trade, if there is a curve at all.
    pub fn final_balance(&self) -> Option<f64> {
        self.equity_curve.last().map(|p| p.balance)
    }
}

/// Reconstruct the account balance trade by trade.
///
/// The starting balance is `current_balance - total_pnl`. Closed trades are
/// replayed in ascending order of their open timestamp (ties keep input
/// order), and each trade's realized return is applied as a percentage of
/// the balance at that point, so returns compound.
pub fn compute_equity_curve(
    trades: &[TradeRecord],
    performance: Option<&PerformanceSnapshot>,
    calendar: &CalendarPolicy,
) -> Vec<EquityPoint> {
    replay_equity(trades, performance, calendar).0
}

fn replay_equity(
    trades: &[TradeRecord],
    performance: Option<&PerformanceSnapshot>,
    calendar: &CalendarPolicy,
) -> (Vec<EquityPoint>, Vec<MalformedTimestamp>) {
    let Some(performance) = performance else {
        return (Vec::new(), Vec::new());
    };
    if trades.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut skipped = Vec::new();
    let mut closed: Vec<(DateTime<Utc>, &TradeRecord)> = Vec::new();
    for trade in trades.iter().filter(|t| t.is_closed()) {
        match calendar.parse_instant(&trade.timestamp) {
            Some(at) => closed.push((at, trade)),
            None => skipped.push(malformed(trade, TimestampField::Timestamp, &trade.timestamp)),
        }
    }
    // sort_by_key is stable
    closed.sort_by_key(|(at, _)| *at);

    let mut balance = performance.starting_balance();
    let mut curve = Vec::with_capacity(closed.len() + 1);
    curve.push(EquityPoint {
        label: START_LABEL.to_string(),
        balance,
        pnl: 0.0,
        symbol: None,
        side: None,
        timestamp: None,
    });

    for (n, (at, trade)) in closed.into_iter().enumerate() {
        let pnl = trade.realized_return() / 100.0 * balance;
        balance += pnl;
        curve.push(EquityPoint {
            label: format!("Trade {}", n + 1),
            balance,
            pnl,
            symbol: Some(trade.symbol.clone()),
            side: Some(trade.side),
            timestamp: Some(at),
        });
    }

    (curve, skipped)
}

/// Win/loss statistics per symbol, in order of each symbol's first closed
/// trade.
pub fn compute_symbol_performance(trades: &[TradeRecord]) -> Vec<SymbolStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<SymbolStat> = Vec::new();

    for trade in trades.iter().filter(|t| t.is_closed()) {
        let slot = *index.entry(trade.symbol.as_str()).or_insert_with(|| {
            stats.push(SymbolStat {
                symbol: trade.symbol.clone(),
                wins: 0,
                losses: 0,
                total_pnl: 0.0,
                total: 0,
                win_rate: 0.0,
            });
            stats.len() - 1
        });

        let stat = &mut stats[slot];
        match trade.status {
            TradeStatus::ClosedWin => stat.wins += 1,
            _ => stat.losses += 1,
        }
        stat.total_pnl += trade.realized_return();
    }

    for stat in &mut stats {
        stat.total = stat.wins + stat.losses;
        stat.win_rate = if stat.total > 0 {
            stat.wins as f64 / stat.total as f64 * 100.0
        } else {
            0.0
        };
    }

    stats
}

/// Realized return summed per calendar day of exit, oldest day first.
/// Closed trades without an exit timestamp are left out.
pub fn compute_daily_pnl(trades: &[TradeRecord], calendar: &CalendarPolicy) -> Vec<DailyPnl> {
    bucket_daily(trades, calendar).0
}

fn bucket_daily(
    trades: &[TradeRecord],
    calendar: &CalendarPolicy,
) -> (Vec<DailyPnl>, Vec<MalformedTimestamp>) {
    let mut skipped = Vec::new();
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for trade in trades.iter().filter(|t| t.is_closed()) {
        let Some(raw) = trade.exit_timestamp() else {
            continue;
        };
        let Some(exited) = calendar.parse_instant(raw) else {
            skipped.push(malformed(trade, TimestampField::ExitTimestamp, raw));
            continue;
        };
        let entry = days.entry(calendar.day_of(exited)).or_insert((0.0, 0));
        entry.0 += trade.realized_return();
        entry.1 += 1;
    }

    let daily = days
        .into_iter()
        .map(|(date, (pnl, trades))| DailyPnl { date, pnl, trades })
        .collect();
    (daily, skipped)
}

pub fn compute_distribution(trades: &[TradeRecord]) -> Distribution {
    trades
        .iter()
        .fold(Distribution::default(), |mut dist, trade| {
            match trade.status {
                TradeStatus::ClosedWin => dist.wins += 1,
                TradeStatus::ClosedLoss => dist.losses += 1,
                TradeStatus::Open | TradeStatus::Unknown => {}
            }
            dist
        })
}

fn malformed(trade: &TradeRecord, field: TimestampField, value: &str) -> MalformedTimestamp {
    let err = MalformedTimestamp {
        trade_id: trade.id.clone(),
        field,
        value: value.to_string(),
    };
    tracing::warn!(trade_id = %trade.id, %field, value, "skipping trade with malformed timestamp");
    err
}
