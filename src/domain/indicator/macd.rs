//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! The line is defined wherever both EMAs are. The signal line is NaN for the
//! first `slow + signal - 1` bars (35 bars are needed for the defaults).

use crate::domain::indicator::ema::calculate_ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    let mut signal = calculate_ema(&line, signal_period);
    let warmup = (slow + signal_period).saturating_sub(1);
    for value in signal.iter_mut().take(warmup) {
        *value = f64::NAN;
    }

    MacdSeries { line, signal }
}

pub fn calculate_macd_default(closes: &[f64]) -> MacdSeries {
    calculate_macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
