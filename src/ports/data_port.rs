//! Market data access port.

use crate::domain::compliance::FundamentalSnapshot;
use crate::domain::error::MizanError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

/// Supplies price history and fundamentals by ticker. Implementations own
/// timeouts and retries; the domain only sees the result.
pub trait DataPort {
    /// Daily bars with `start_date <= date <= end_date`, oldest first.
    fn fetch_history(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, MizanError>;

    fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot, MizanError>;
}
