//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonTradeAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::analytics::AnalyticsReport;
use crate::domain::calendar::CalendarPolicy;
use crate::domain::config_validation::{
    validate_analysis_config, validate_input_config, validate_trade_file_extension,
};
use crate::domain::error::TradescopeError;
use crate::domain::performance::PerformanceSnapshot;
use crate::domain::trade::TradeRecord;
use crate::domain::validation::{validate_trades, TradeIssue};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::trade_port::TradePort;

const DEFAULT_REPORT_PATH: &str = "report.json";
const DEFAULT_TOP_SYMBOLS: i64 = 10;

#[derive(Parser, Debug)]
#[command(name = "tradescope", about = "Trade history analytics for trading bots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the equity curve, per-symbol stats, daily P&L and win/loss split
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Trade file to use instead of [input] trades
        #[arg(long)]
        trades: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// local, utc or an offset such as +02:00
        #[arg(long)]
        timezone: Option<String>,
        /// Only analyse trades on this symbol
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Check a trade file for inconsistent records
    Validate {
        #[arg(long)]
        trades: PathBuf,
        #[arg(long)]
        timezone: Option<String>,
    },
}

/// Everything the analysis needs besides the trades themselves.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub calendar: CalendarPolicy,
    pub performance: Option<PerformanceSnapshot>,
    pub symbol: Option<String>,
    pub output: PathBuf,
    pub top_symbols: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            trades,
            output,
            timezone,
            symbol,
        } => run_analyze(
            &config,
            trades.as_deref(),
            output,
            timezone.as_deref(),
            symbol,
        ),
        Command::Validate { trades, timezone } => run_validate(&trades, timezone.as_deref()),
    }
}

fn fail(err: TradescopeError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(fail)
}

fn run_analyze(
    config_path: &Path,
    trades_override: Option<&Path>,
    output_override: Option<PathBuf>,
    timezone_override: Option<&str>,
    symbol: Option<String>,
) -> ExitCode {
    // Stage 1: Load and validate config
    tracing::info!(path = %config_path.display(), "loading config");
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if trades_override.is_none() {
        if let Err(e) = validate_input_config(&config) {
            return fail(e);
        }
    }
    if let Err(e) = validate_analysis_config(&config) {
        return fail(e);
    }

    // Stage 2: Resolve options
    let calendar = match build_calendar(&config, timezone_override) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let options = AnalysisOptions {
        calendar,
        performance: build_performance(&config),
        symbol: symbol.map(|s| s.trim().to_uppercase()).filter(|s| !s.is_empty()),
        output: output_override
            .or_else(|| config.get_path("report", "output"))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH)),
        top_symbols: config
            .get_int("report", "top_symbols", DEFAULT_TOP_SYMBOLS)
            .max(0) as usize,
    };

    // Stage 3: Open the trade source
    let trades_path = match trades_override {
        Some(p) => p.to_path_buf(),
        None => match config.get_path("input", "trades") {
            Some(p) => p,
            None => {
                return fail(TradescopeError::ConfigMissing {
                    section: "input".into(),
                    key: "trades".into(),
                });
            }
        },
    };
    let source = match open_trade_source(&trades_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let reporter = JsonReportAdapter::new(config.get_bool("report", "pretty", true));
    match run_analysis_pipeline(source.as_ref(), &reporter, &options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

/// Pick the trade adapter from the file extension.
pub fn open_trade_source(path: &Path) -> Result<Box<dyn TradePort>, TradescopeError> {
    let display = path.display().to_string();
    validate_trade_file_extension(&display)?;
    if display.to_lowercase().ends_with(".json") {
        Ok(Box::new(JsonTradeAdapter::new(path.to_path_buf())))
    } else {
        Ok(Box::new(CsvTradeAdapter::new(path.to_path_buf())))
    }
}

/// Calendar from the flag if given, else `[analytics] timezone`, else local.
pub fn build_calendar(
    config: &dyn ConfigPort,
    timezone_override: Option<&str>,
) -> Result<CalendarPolicy, TradescopeError> {
    let configured = config.get_string("analytics", "timezone");
    parse_calendar(timezone_override.or(configured.as_deref()))
}

pub fn parse_calendar(timezone: Option<&str>) -> Result<CalendarPolicy, TradescopeError> {
    match timezone {
        Some(tz) => tz
            .parse::<CalendarPolicy>()
            .map_err(|e| TradescopeError::ConfigInvalid {
                section: "analytics".into(),
                key: "timezone".into(),
                reason: e.to_string(),
            }),
        None => Ok(CalendarPolicy::default()),
    }
}

/// Snapshot from the `[performance]` section, if the section sets a balance.
pub fn build_performance(config: &dyn ConfigPort) -> Option<PerformanceSnapshot> {
    if !config.has("performance", "current_balance") {
        return None;
    }
    let get = |key: &str| config.get_double("performance", key, 0.0);
    let count = |key: &str| config.get_int("performance", key, 0).clamp(0, u32::MAX as i64) as u32;

    Some(PerformanceSnapshot {
        current_balance: get("current_balance"),
        total_pnl: get("total_pnl"),
        total_pnl_pct: get("total_pnl_pct"),
        winning_trades: count("winning_trades"),
        losing_trades: count("losing_trades"),
        win_rate: get("win_rate"),
        avg_win: get("avg_win"),
        avg_loss: get("avg_loss"),
        profit_factor: get("profit_factor"),
        max_drawdown: get("max_drawdown"),
        sharpe_ratio: get("sharpe_ratio"),
    })
}

pub fn filter_symbol(trades: Vec<TradeRecord>, symbol: Option<&str>) -> Vec<TradeRecord> {
    match symbol {
        Some(sym) => trades
            .into_iter()
            .filter(|t| t.symbol.eq_ignore_ascii_case(sym))
            .collect(),
        None => trades,
    }
}

pub fn run_analysis_pipeline(
    source: &dyn TradePort,
    reporter: &dyn ReportPort,
    options: &AnalysisOptions,
) -> Result<AnalyticsReport, TradescopeError> {
    // Stage 4: Fetch trades and the performance snapshot
    let trades = source.fetch_trades()?;
    let performance = match source.fetch_performance()? {
        Some(p) => Some(p),
        None => options.performance.clone(),
    };
    if performance.is_none() {
        tracing::warn!("no performance snapshot available; equity curve will be empty");
    }

    let trades = filter_symbol(trades, options.symbol.as_deref());
    tracing::info!(
        trades = trades.len(),
        calendar = %options.calendar,
        symbol = options.symbol.as_deref().unwrap_or("*"),
        "running analytics"
    );

    // Stage 5: Compute
    let report = AnalyticsReport::compute(&trades, performance.as_ref(), &options.calendar);

    // Stage 6: Console summary
    print_summary(&report, performance.as_ref(), options.top_symbols);

    // Stage 7: Write report
    reporter.write(&report, &options.output)?;
    eprintln!("\nReport written to: {}", options.output.display());
    Ok(report)
}

fn print_summary(
    report: &AnalyticsReport,
    performance: Option<&PerformanceSnapshot>,
    top_symbols: usize,
) {
    eprintln!("\n=== Account ===");
    match (performance, report.equity_curve.first(), report.final_balance()) {
        (Some(perf), Some(start), Some(end)) => {
            eprintln!("Starting Balance: {:.2}", start.balance);
            eprintln!("Replayed Balance: {:.2}", end);
            eprintln!("Reported Balance: {:.2}", perf.current_balance);
        }
        (Some(perf), _, _) => {
            eprintln!("Reported Balance: {:.2}", perf.current_balance);
        }
        (None, _, _) => eprintln!("No performance snapshot"),
    }

    let dist = &report.distribution;
    eprintln!("\n=== Closed Trades ===");
    eprintln!("Wins:             {}", dist.wins);
    eprintln!("Losses:           {}", dist.losses);
    if dist.total() > 0 {
        eprintln!(
            "Win Rate:         {:.1}%",
            dist.wins as f64 / dist.total() as f64 * 100.0
        );
    }

    if !report.symbols.is_empty() {
        let mut ranked: Vec<_> = report.symbols.iter().collect();
        ranked.sort_by(|a, b| b.total_pnl.total_cmp(&a.total_pnl));
        eprintln!("\n=== Per-Symbol Summary ===");
        for stat in ranked.into_iter().take(top_symbols) {
            let sign = if stat.total_pnl >= 0.0 { "+" } else { "" };
            eprintln!(
                "  {}:  {} trades, {:.1}% win rate, {}{:.2}%",
                stat.symbol, stat.total, stat.win_rate, sign, stat.total_pnl,
            );
        }
    }

    if let (Some(first), Some(last)) = (report.daily.first(), report.daily.last()) {
        eprintln!(
            "\nDaily P&L: {} days, {} to {}",
            report.daily.len(),
            first.date,
            last.date
        );
    }

    if !report.skipped.is_empty() {
        eprintln!("\nSkipped {} malformed timestamp(s):", report.skipped.len());
        for skipped in &report.skipped {
            eprintln!("  {}", skipped);
        }
    }
}

/// Load a trade file and list everything inconsistent in it.
pub fn check_trades(
    trades_path: &Path,
    calendar: &CalendarPolicy,
) -> Result<(usize, Vec<TradeIssue>), TradescopeError> {
    let source = open_trade_source(trades_path)?;
    let trades = source.fetch_trades()?;
    Ok((trades.len(), validate_trades(&trades, calendar)))
}

fn run_validate(trades_path: &Path, timezone: Option<&str>) -> ExitCode {
    eprintln!("Validating trades: {}", trades_path.display());

    let calendar = match parse_calendar(timezone) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let (count, issues) = match check_trades(trades_path, &calendar) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    if issues.is_empty() {
        eprintln!("{} trades, no issues found.", count);
        return ExitCode::SUCCESS;
    }

    for issue in &issues {
        println!("{}", issue);
    }
    let failed: HashSet<&str> = issues.iter().map(|i| i.trade_id.as_str()).collect();
    fail(TradescopeError::InvalidTrades {
        count: failed.len(),
    })
}
