//! Market scan: run the signal pipeline over a ticker universe and keep the
//! Buy signals.
//!
//! Tickers are analysed independently on a bounded rayon pool. A failure on
//! one ticker, panics included, is recorded as a [`SkippedTicker`] and never
//! aborts the scan.
//! Output preserves input ticker order.

use crate::domain::analysis::history_window;
use crate::domain::config::ScannerSettings;
use crate::domain::error::MizanError;
use crate::domain::indicator::compute_indicators;
use crate::domain::signal::{generate_signal, Recommendation, TradeLevels, TradeSignal};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub ticker: String,
    pub date: NaiveDate,
    pub score: i32,
    pub levels: TradeLevels,
}

impl Opportunity {
    pub fn price(&self) -> f64 {
        self.levels.entry
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    DataUnavailable(String),
    InsufficientBars { bars: usize, minimum: usize },
    AnalysisFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DataUnavailable(reason) => write!(f, "data unavailable: {}", reason),
            SkipReason::InsufficientBars { bars, minimum } => {
                write!(f, "only {} bars, minimum {} required", bars, minimum)
            }
            SkipReason::AnalysisFailed(reason) => write!(f, "analysis failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub scanned: usize,
    pub opportunities: Vec<Opportunity>,
    pub skipped: Vec<SkippedTicker>,
}

/// Scan `settings.tickers` as of `as_of`.
pub fn scan_market<D>(
    data: &D,
    settings: &ScannerSettings,
    as_of: NaiveDate,
) -> Result<ScanReport, MizanError>
where
    D: DataPort + Sync + ?Sized,
{
    let (start, end) = history_window(as_of, settings.lookback_months, "scanner")?;
    let tickers = &settings.tickers;
    if tickers.is_empty() {
        return Ok(ScanReport::default());
    }

    let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
    let workers = pool_size(settings.workers, tickers.len(), cpus);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("mizan-scan-{}", i))
        .build()
        .map_err(|e| MizanError::Io(std::io::Error::other(e)))?;

    info!(
        tickers = tickers.len(),
        workers,
        %start,
        %end,
        "scanning market"
    );

    let outcomes: Vec<Result<Recommendation, SkipReason>> = pool.install(|| {
        tickers
            .par_iter()
            .map(|ticker| {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    scan_ticker(data, ticker, start, end, settings.min_bars)
                }))
                .unwrap_or_else(|payload| {
                    Err(SkipReason::AnalysisFailed(format!(
                        "panicked: {}",
                        panic_message(payload.as_ref())
                    )))
                })
            })
            .collect()
    });

    let mut report = ScanReport {
        scanned: tickers.len(),
        ..Default::default()
    };

    for (ticker, outcome) in tickers.iter().zip(outcomes) {
        match outcome {
            Ok(rec) => {
                debug!(%ticker, score = rec.score, signal = %rec.signal, "scored");
                if let TradeSignal::Buy(levels) = rec.signal {
                    report.opportunities.push(Opportunity {
                        ticker: ticker.clone(),
                        date: rec.date,
                        score: rec.score,
                        levels,
                    });
                }
            }
            Err(reason) => {
                warn!(%ticker, %reason, "skipping ticker");
                report.skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        opportunities = report.opportunities.len(),
        skipped = report.skipped.len(),
        "scan complete"
    );
    Ok(report)
}

/// Threads for the scan pool. `workers == 0` means one per ticker, capped at
/// the available CPUs.
fn pool_size(workers: usize, tickers: usize, cpus: usize) -> usize {
    let wanted = match workers {
        0 => tickers.min(cpus.max(1)),
        n => n,
    };
    wanted.min(tickers).max(1)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn scan_ticker<D>(
    data: &D,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    min_bars: usize,
) -> Result<Recommendation, SkipReason>
where
    D: DataPort + Sync + ?Sized,
{
    let bars = data
        .fetch_history(ticker, start, end)
        .map_err(|e| SkipReason::DataUnavailable(e.to_string()))?;

    if bars.len() < min_bars {
        return Err(SkipReason::InsufficientBars {
            bars: bars.len(),
            minimum: min_bars,
        });
    }

    compute_indicators(&bars)
        .and_then(|indicators| generate_signal(&indicators))
        .map_err(|e| SkipReason::AnalysisFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reason_display() {
        let reason = SkipReason::InsufficientBars {
            bars: 12,
            minimum: 50,
        };
        assert_eq!(reason.to_string(), "only 12 bars, minimum 50 required");
        assert_eq!(
            SkipReason::DataUnavailable("timeout".into()).to_string(),
            "data unavailable: timeout"
        );
    }

    #[test]
    fn pool_size_auto_is_capped_by_cpus() {
        assert_eq!(pool_size(0, 500, 8), 8);
        assert_eq!(pool_size(0, 3, 8), 3);
        assert_eq!(pool_size(0, 5, 0), 1);
    }

    #[test]
    fn pool_size_explicit_is_capped_by_tickers() {
        assert_eq!(pool_size(4, 10, 2), 4);
        assert_eq!(pool_size(16, 3, 8), 3);
    }

    #[test]
    fn panic_message_reads_payload() {
        let payload = panic::catch_unwind(|| panic!("feed exploded")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "feed exploded");
    }

    #[test]
    fn opportunity_price_is_entry() {
        let opp = Opportunity {
            ticker: "NVDA".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            score: 3,
            levels: TradeLevels {
                entry: 850.0,
                stop_loss: 820.0,
                take_profit: 910.0,
            },
        };
        assert_eq!(opp.price(), 850.0);
    }
}
