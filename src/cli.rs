//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::summary_narrator::SummaryNarrator;
use crate::domain::analysis::{analyze_ticker, screen_ticker, TickerAnalysis};
use crate::domain::compliance::{ComplianceScreener, ComplianceVerdict, FundamentalSnapshot};
use crate::domain::config::{load_settings, Settings};
use crate::domain::error::MizanError;
use crate::domain::narrative::fmt_value;
use crate::domain::scanner::{scan_market, ScanReport};
use crate::domain::universe::parse_tickers;
use crate::ports::narrative_port::NarrativePort;

#[derive(Parser, Debug)]
#[command(
    name = "mizan",
    about = "Technical trade signals and Shariah compliance screening"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// INI settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding <TICKER>.csv and fundamentals.csv (overrides [data] dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Analysis date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Indicators, signal, compliance and narrative for one ticker
    Analyze {
        #[arg(short, long)]
        ticker: String,
        /// Skip the narrative section
        #[arg(long)]
        no_narrative: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Shariah compliance screen for one ticker
    Screen {
        #[arg(short, long)]
        ticker: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Scan a ticker universe for Buy signals
    Scan {
        /// Comma-separated tickers (overrides [scanner] tickers)
        #[arg(long)]
        tickers: Option<String>,
        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Installs the stderr `tracing` subscriber. `RUST_LOG` overrides the
/// default `info` filter.
pub fn setup_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            ticker,
            no_narrative,
            common,
        } => run_analyze(&ticker, no_narrative, &common),
        Command::Screen { ticker, common } => run_screen(&ticker, &common),
        Command::Scan { tickers, common } => run_scan(tickers.as_deref(), &common),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {} (expected YYYY-MM-DD)", raw, e))
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MizanError> {
    FileConfigAdapter::from_file(path).map_err(|e| MizanError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Settings from `--config` (or defaults), with the data directory resolved
/// from `--data-dir` first and `[data] dir` second.
pub fn resolve_settings(common: &CommonArgs) -> Result<(Settings, PathBuf), MizanError> {
    let settings = match &common.config {
        Some(path) => load_settings(&load_config(path)?)?,
        None => load_settings(&FileConfigAdapter::empty())?,
    };

    let data_dir = common
        .data_dir
        .clone()
        .or_else(|| settings.data_dir.clone())
        .ok_or_else(|| MizanError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        })?;

    Ok((settings, data_dir))
}

fn as_of(common: &CommonArgs) -> NaiveDate {
    common.as_of.unwrap_or_else(|| Local::now().date_naive())
}

pub fn run_analyze(
    ticker: &str,
    no_narrative: bool,
    common: &CommonArgs,
) -> Result<String, MizanError> {
    let (settings, data_dir) = resolve_settings(common)?;
    let data = CsvAdapter::new(data_dir);
    let screener = ComplianceScreener::new(settings.compliance);
    let narrator: Option<&dyn NarrativePort> = if no_narrative {
        None
    } else {
        Some(&SummaryNarrator)
    };

    let analysis = analyze_ticker(
        &data,
        &screener,
        narrator,
        ticker,
        as_of(common),
        &settings.analysis,
    )?;
    Ok(render_analysis(&analysis, !no_narrative))
}

pub fn run_screen(ticker: &str, common: &CommonArgs) -> Result<String, MizanError> {
    let (settings, data_dir) = resolve_settings(common)?;
    let data = CsvAdapter::new(data_dir);
    let screener = ComplianceScreener::new(settings.compliance);

    let (snapshot, verdict) = screen_ticker(&data, &screener, ticker)?;
    Ok(render_screen(&ticker.trim().to_uppercase(), &snapshot, &verdict))
}

pub fn run_scan(tickers: Option<&str>, common: &CommonArgs) -> Result<String, MizanError> {
    let (mut settings, data_dir) = resolve_settings(common)?;
    if let Some(list) = tickers {
        settings.scanner.tickers = parse_tickers(list)?;
    }
    let data = CsvAdapter::new(data_dir);

    let report = scan_market(&data, &settings.scanner, as_of(common))?;
    Ok(render_scan(&report))
}

fn render_verdict(out: &mut Vec<String>, verdict: &ComplianceVerdict) {
    out.push(format!(
        "Compliance: {} / {}",
        verdict.status,
        verdict.status.arabic_label()
    ));
    out.push(format!("  {}", verdict.reason));
    if let Some(r) = &verdict.ratios {
        out.push(format!(
            "  Debt/MarketCap {:.2}%  Cash+Interest/MarketCap {:.2}%  Receivables/TotalAssets {:.2}%",
            r.debt * 100.0,
            r.cash_and_interest * 100.0,
            r.receivables * 100.0
        ));
    }
}

pub fn render_analysis(analysis: &TickerAnalysis, with_narrative: bool) -> String {
    let rec = &analysis.recommendation;
    let name = analysis
        .fundamentals
        .company_name
        .as_deref()
        .unwrap_or(&analysis.ticker);

    let mut out = vec![format!(
        "{} ({}) close {:.2} on {}",
        analysis.ticker, name, analysis.last_bar.close, analysis.last_bar.date
    )];

    if let Some(last) = analysis.indicators.len().checked_sub(1) {
        let values: Vec<String> = analysis
            .indicators
            .columns()
            .iter()
            .map(|(kind, column)| format!("{} {}", kind, fmt_value(column[last])))
            .collect();
        out.push(values.join("  "));
    }

    out.push(format!(
        "Signal: {} / {} (score {}: rsi {:+}, macd {:+}, trend {:+})",
        rec.signal,
        rec.signal.arabic_label(),
        rec.score,
        rec.breakdown.rsi,
        rec.breakdown.macd_cross,
        rec.breakdown.trend
    ));
    if let Some(l) = rec.signal.levels() {
        out.push(format!(
            "  entry {:.2}  stop {:.2}  target {:.2}",
            l.entry, l.stop_loss, l.take_profit
        ));
    }

    render_verdict(&mut out, &analysis.compliance);

    if with_narrative {
        out.push(String::new());
        out.push(analysis.narrative.text().to_string());
    }
    out.join("\n")
}

pub fn render_screen(
    ticker: &str,
    snapshot: &FundamentalSnapshot,
    verdict: &ComplianceVerdict,
) -> String {
    let mut out = vec![format!(
        "{} ({})  sector: {}  industry: {}",
        ticker,
        snapshot.company_name.as_deref().unwrap_or("N/A"),
        snapshot.sector.as_deref().unwrap_or("N/A"),
        snapshot.industry.as_deref().unwrap_or("N/A"),
    )];
    render_verdict(&mut out, verdict);
    out.join("\n")
}

pub fn render_scan(report: &ScanReport) -> String {
    let mut out = vec![format!(
        "Scanned {} tickers: {} buy signals, {} skipped",
        report.scanned,
        report.opportunities.len(),
        report.skipped.len()
    )];

    for opp in &report.opportunities {
        out.push(format!(
            "  {:<6} {}  price {:.2}  stop {:.2}  target {:.2}  score {}",
            opp.ticker,
            opp.date,
            opp.price(),
            opp.levels.stop_loss,
            opp.levels.take_profit,
            opp.score
        ));
    }
    for skipped in &report.skipped {
        out.push(format!("  skipped {}: {}", skipped.ticker, skipped.reason));
    }
    out.join("\n")
}
