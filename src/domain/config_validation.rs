//! Configuration validation.
//!
//! Checks the INI file before any trades are loaded.

use crate::domain::calendar::CalendarPolicy;
use crate::domain::error::TradescopeError;
use crate::ports::config_port::ConfigPort;

pub const PERFORMANCE_KEYS: [&str; 11] = [
    "current_balance",
    "total_pnl",
    "total_pnl_pct",
    "winning_trades",
    "losing_trades",
    "win_rate",
    "avg_win",
    "avg_loss",
    "profit_factor",
    "max_drawdown",
    "sharpe_ratio",
];

/// Performance keys holding trade counts rather than amounts.
const COUNT_KEYS: [&str; 2] = ["winning_trades", "losing_trades"];

pub fn validate_input_config(config: &dyn ConfigPort) -> Result<(), TradescopeError> {
    match config.get_string("input", "trades") {
        Some(path) if !path.trim().is_empty() => validate_trade_file_extension(path.trim()),
        _ => Err(TradescopeError::ConfigMissing {
            section: "input".to_string(),
            key: "trades".to_string(),
        }),
    }
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), TradescopeError> {
    validate_timezone(config)?;
    validate_performance(config)?;
    Ok(())
}

pub fn validate_trade_file_extension(path: &str) -> Result<(), TradescopeError> {
    let lower = path.to_lowercase();
    if lower.ends_with(".csv") || lower.ends_with(".json") {
        Ok(())
    } else {
        Err(TradescopeError::ConfigInvalid {
            section: "input".to_string(),
            key: "trades".to_string(),
            reason: format!("unsupported trade file {}, expected .csv or .json", path),
        })
    }
}

fn validate_timezone(config: &dyn ConfigPort) -> Result<(), TradescopeError> {
    if let Some(tz) = config.get_string("analytics", "timezone") {
        tz.parse::<CalendarPolicy>()
            .map_err(|e| TradescopeError::ConfigInvalid {
                section: "analytics".to_string(),
                key: "timezone".to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

fn validate_performance(config: &dyn ConfigPort) -> Result<(), TradescopeError> {
    for key in PERFORMANCE_KEYS {
        let Some(raw) = config.get_string("performance", key) else {
            continue;
        };
        let reason = if COUNT_KEYS.contains(&key) {
            raw.trim()
                .parse::<u32>()
                .err()
                .map(|_| format!("{} must be a whole number of trades", key))
        } else {
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => None,
                _ => Some(format!("{} must be a finite number", key)),
            }
        };
        if let Some(reason) = reason {
            return Err(TradescopeError::ConfigInvalid {
                section: "performance".to_string(),
                key: key.to_string(),
                reason,
            });
        }
    }

    let has_section = PERFORMANCE_KEYS
        .iter()
        .any(|key| config.has("performance", key));
    if has_section && !config.has("performance", "current_balance") {
        return Err(TradescopeError::ConfigMissing {
            section: "performance".to_string(),
            key: "current_balance".to_string(),
        });
    }
    Ok(())
}
