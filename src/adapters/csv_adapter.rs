//! CSV file data adapter.
//!
//! Layout under the base directory:
//! - `<TICKER>.csv`: `date,open,high,low,close,volume`, one row per trading day
//! - `fundamentals.csv`: one row per ticker, headed by [`FUNDAMENTAL_COLUMNS`];
//!   empty cells mean unknown

use crate::domain::compliance::{BalanceSheet, FundamentalSnapshot};
use crate::domain::error::MizanError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const FUNDAMENTALS_FILE: &str = "fundamentals.csv";

pub const FUNDAMENTAL_COLUMNS: [&str; 13] = [
    "ticker",
    "company_name",
    "sector",
    "industry",
    "market_cap",
    "total_debt",
    "cash_and_equivalents",
    "short_term_investments",
    "net_receivables",
    "total_assets",
    "trailing_pe",
    "forward_pe",
    "revenue_growth",
];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn history_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read(&self, path: &Path) -> Result<String, MizanError> {
        fs::read_to_string(path).map_err(|e| MizanError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

fn field<'a>(record: &'a StringRecord, index: usize, name: &str) -> Result<&'a str, MizanError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| MizanError::malformed(format!("missing {} column", name)))
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, MizanError>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| MizanError::malformed(format!("invalid {} value '{}': {}", name, raw, e)))
}

fn parse_optional(raw: Option<&str>, name: &str) -> Result<Option<f64>, MizanError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_number(s, name).map(Some),
    }
}

fn parse_bar(record: &StringRecord) -> Result<PriceBar, MizanError> {
    let date_str = field(record, 0, "date")?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| MizanError::malformed(format!("invalid date '{}': {}", date_str, e)))?;

    Ok(PriceBar {
        date,
        open: parse_number(field(record, 1, "open")?, "open")?,
        high: parse_number(field(record, 2, "high")?, "high")?,
        low: parse_number(field(record, 3, "low")?, "low")?,
        close: parse_number(field(record, 4, "close")?, "close")?,
        volume: parse_number(field(record, 5, "volume")?, "volume")?,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_history(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, MizanError> {
        let path = self.history_path(ticker);
        let content = self.read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result
                .map_err(|e| MizanError::malformed(format!("CSV parse error: {}", e)))?;
            let bar = parse_bar(&record)?;
            if bar.date < start_date || bar.date > end_date {
                continue;
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        debug!(%ticker, bars = bars.len(), path = %path.display(), "read history");
        Ok(bars)
    }

    fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot, MizanError> {
        let path = self.base_path.join(FUNDAMENTALS_FILE);
        let content = self.read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| MizanError::malformed(format!("CSV parse error: {}", e)))?
            .clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);
        let ticker_col = column("ticker")
            .ok_or_else(|| MizanError::malformed("fundamentals file has no ticker column"))?;

        for result in rdr.records() {
            let record = result
                .map_err(|e| MizanError::malformed(format!("CSV parse error: {}", e)))?;
            if !record
                .get(ticker_col)
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(ticker))
            {
                continue;
            }

            let text = |name: &str| {
                column(name)
                    .and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            let number = |name: &str| {
                parse_optional(column(name).and_then(|i| record.get(i)), name)
            };

            let sheet = BalanceSheet {
                total_debt: number("total_debt")?,
                cash_and_equivalents: number("cash_and_equivalents")?,
                short_term_investments: number("short_term_investments")?,
                net_receivables: number("net_receivables")?,
                total_assets: number("total_assets")?,
            };

            debug!(%ticker, path = %path.display(), "read fundamentals");
            return Ok(FundamentalSnapshot {
                company_name: text("company_name"),
                sector: text("sector"),
                industry: text("industry"),
                market_cap: number("market_cap")?,
                balance_sheet: (!sheet.is_empty()).then_some(sheet),
                trailing_pe: number("trailing_pe")?,
                forward_pe: number("forward_pe")?,
                revenue_growth: number("revenue_growth")?,
            });
        }

        Err(MizanError::DataSource {
            reason: format!("no fundamentals for {} in {}", ticker, path.display()),
        })
    }
}
