//! Technical indicator implementations.
//!
//! Every calculator returns a `Vec<f64>` aligned index-for-index with its
//! input, using NaN for bars that precede the lookback window. The aligned
//! bundle consumed by the signal generator is [`IndicatorSeries`].

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

use crate::domain::error::MizanError;
use crate::domain::ohlcv::{validate_series, PriceBar};
use chrono::NaiveDate;
use std::fmt;

pub use atr::calculate_atr;
pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_default, MacdSeries};
pub use rsi::calculate_rsi;

pub const TREND_FAST_SPAN: usize = 20;
pub const TREND_SLOW_SPAN: usize = 50;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    /// Signal line of the MACD with the same parameters.
    MacdSignal {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD signal({},{},{})", fast, slow, signal)
            }
        }
    }
}

/// Indicator values at a single bar. Fields are NaN while undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub rsi14: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub atr14: f64,
}

/// Parallel indicator arrays aligned with the price series they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub ema20: Vec<f64>,
    pub ema50: Vec<f64>,
    pub rsi14: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub atr14: Vec<f64>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<IndicatorPoint> {
        if index >= self.len() {
            return None;
        }
        Some(IndicatorPoint {
            date: self.dates[index],
            close: self.closes[index],
            ema20: self.ema20[index],
            ema50: self.ema50[index],
            rsi14: self.rsi14[index],
            macd: self.macd[index],
            macd_signal: self.macd_signal[index],
            atr14: self.atr14[index],
        })
    }

    pub fn latest(&self) -> Option<IndicatorPoint> {
        self.len().checked_sub(1).and_then(|i| self.point(i))
    }

    /// The last `n` points, oldest first.
    pub fn tail(&self, n: usize) -> Vec<IndicatorPoint> {
        let start = self.len().saturating_sub(n);
        (start..self.len()).filter_map(|i| self.point(i)).collect()
    }

    /// Every indicator column paired with its identity, for display.
    pub fn columns(&self) -> [(IndicatorType, &[f64]); 6] {
        let (fast, slow, signal) = (macd::DEFAULT_FAST, macd::DEFAULT_SLOW, macd::DEFAULT_SIGNAL);
        [
            (IndicatorType::Ema(TREND_FAST_SPAN), self.ema20.as_slice()),
            (IndicatorType::Ema(TREND_SLOW_SPAN), self.ema50.as_slice()),
            (IndicatorType::Rsi(RSI_PERIOD), self.rsi14.as_slice()),
            (IndicatorType::Macd { fast, slow, signal }, self.macd.as_slice()),
            (
                IndicatorType::MacdSignal { fast, slow, signal },
                self.macd_signal.as_slice(),
            ),
            (IndicatorType::Atr(ATR_PERIOD), self.atr14.as_slice()),
        ]
    }
}

/// Compute the full indicator bundle for a validated, non-empty series.
pub fn compute_indicators(bars: &[PriceBar]) -> Result<IndicatorSeries, MizanError> {
    if bars.is_empty() {
        return Err(MizanError::insufficient("indicator calculation", 0, 1));
    }
    validate_series(bars)?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let MacdSeries { line, signal } = calculate_macd_default(&closes);

    Ok(IndicatorSeries {
        dates: bars.iter().map(|b| b.date).collect(),
        ema20: calculate_ema(&closes, TREND_FAST_SPAN),
        ema50: calculate_ema(&closes, TREND_SLOW_SPAN),
        rsi14: calculate_rsi(&closes, RSI_PERIOD),
        macd: line,
        macd_signal: signal,
        atr14: calculate_atr(bars, ATR_PERIOD),
        closes,
    })
}
