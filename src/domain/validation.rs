//! Trade record validation.
//!
//! The analytics never require a clean history; this module exists so a
//! caller can find out what the service sent that the views had to work
//! around.

use std::collections::HashSet;
use std::fmt;

use super::calendar::CalendarPolicy;
use super::error::TimestampField;
use super::trade::{TradeRecord, TradeStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    DuplicateId,
    EmptySymbol,
    UnknownStatus,
    /// Closed trade missing one of its exit fields.
    MissingExitField(&'static str),
    /// Open trade carrying an exit field.
    UnexpectedExitField(&'static str),
    NonPositive(&'static str),
    MalformedTimestamp(TimestampField),
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::DuplicateId => write!(f, "duplicate trade id"),
            IssueKind::EmptySymbol => write!(f, "empty symbol"),
            IssueKind::UnknownStatus => write!(f, "unrecognised status"),
            IssueKind::MissingExitField(field) => write!(f, "closed trade has no {}", field),
            IssueKind::UnexpectedExitField(field) => write!(f, "open trade has {}", field),
            IssueKind::NonPositive(field) => write!(f, "{} must be positive", field),
            IssueKind::MalformedTimestamp(field) => write!(f, "malformed {}", field),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeIssue {
    pub trade_id: String,
    pub kind: IssueKind,
}

impl fmt::Display for TradeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trade {}: {}", self.trade_id, self.kind)
    }
}

pub fn validate_trades(trades: &[TradeRecord], calendar: &CalendarPolicy) -> Vec<TradeIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for trade in trades {
        let mut report = |kind| {
            issues.push(TradeIssue {
                trade_id: trade.id.clone(),
                kind,
            })
        };

        if !seen.insert(trade.id.as_str()) {
            report(IssueKind::DuplicateId);
        }
        if trade.symbol.trim().is_empty() {
            report(IssueKind::EmptySymbol);
        }
        for (field, value) in [
            ("entry_price", trade.entry_price),
            ("quantity", trade.quantity),
            ("leverage", trade.leverage),
        ] {
            if value.is_nan() || value <= 0.0 {
                report(IssueKind::NonPositive(field));
            }
        }
        if calendar.parse_instant(&trade.timestamp).is_none() {
            report(IssueKind::MalformedTimestamp(TimestampField::Timestamp));
        }

        let exit_fields = [
            ("exit_price", trade.exit_price.is_some()),
            ("exit_timestamp", trade.exit_timestamp().is_some()),
            ("actual_return_pct", trade.actual_return_pct.is_some()),
        ];
        match trade.status {
            TradeStatus::Open => {
                for (field, present) in exit_fields {
                    if present {
                        report(IssueKind::UnexpectedExitField(field));
                    }
                }
            }
            TradeStatus::ClosedWin | TradeStatus::ClosedLoss => {
                for (field, present) in exit_fields {
                    if !present {
                        report(IssueKind::MissingExitField(field));
                    }
                }
            }
            TradeStatus::Unknown => report(IssueKind::UnknownStatus),
        }

        if let Some(raw) = trade.exit_timestamp() {
            if calendar.parse_instant(raw).is_none() {
                report(IssueKind::MalformedTimestamp(TimestampField::ExitTimestamp));
            }
        }
    }

    issues
}
