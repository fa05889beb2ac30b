//! Price bar representation and series validation.

use crate::domain::error::MizanError;
use chrono::NaiveDate;

/// One trading-period observation. A price series is a slice of bars in
/// strictly increasing date order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Reject series the data collaborator should never have produced:
/// non-finite or non-positive prices, inverted ranges, unordered dates.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), MizanError> {
    for (i, bar) in bars.iter().enumerate() {
        for (name, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MizanError::malformed(format!(
                    "{} on {} must be a positive number, got {}",
                    name, bar.date, value
                )));
            }
        }
        if bar.high < bar.low {
            return Err(MizanError::malformed(format!(
                "high {} below low {} on {}",
                bar.high, bar.low, bar.date
            )));
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(MizanError::malformed(format!(
                "bar dated {} does not follow {}",
                bar.date,
                bars[i - 1].date
            )));
        }
    }
    Ok(())
}
