//! Average True Range over a simple rolling window.
//!
//! TR[0] = high - low (no previous close), TR[i] = bar.true_range(close[i-1]).
//! ATR[i] = mean(TR[i-period+1..=i]) for i >= period, NaN before.

use crate::domain::ohlcv::PriceBar;

pub fn true_ranges(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

pub fn calculate_atr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() <= period {
        return out;
    }

    let tr = true_ranges(bars);
    for i in period..bars.len() {
        out[i] = tr[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
    }

    out
}
