//! RSI (Relative Strength Index) over a simple rolling window.
//!
//! For each bar with a full window of `period` close-to-close deltas:
//! avg_gain = mean of positive deltas, avg_loss = mean of |negative deltas|,
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//!
//! Degenerate windows: avg_gain == avg_loss == 0 gives 50, avg_loss == 0 gives 100.
//! Warmup: the first `period` bars are NaN (a window needs `period + 1` closes).

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for i in period..closes.len() {
        // deltas[j] is the change into bar j + 1
        let window = &deltas[i - period..i];
        let gain: f64 = window.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
        let loss: f64 = window.iter().filter(|d| **d < 0.0).map(|d| -d).sum::<f64>() / period as f64;
        out[i] = rsi_from_averages(gain, loss);
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
