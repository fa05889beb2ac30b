#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use mizan::domain::compliance::{BalanceSheet, FundamentalSnapshot};
use mizan::domain::error::MizanError;
pub use mizan::domain::ohlcv::PriceBar;
use mizan::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub bars: HashMap<String, Vec<PriceBar>>,
    pub fundamentals: HashMap<String, FundamentalSnapshot>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            fundamentals: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_fundamentals(mut self, ticker: &str, snapshot: FundamentalSnapshot) -> Self {
        self.fundamentals.insert(ticker.to_string(), snapshot);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_history(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, MizanError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(MizanError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .bars
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot, MizanError> {
        self.fundamentals
            .get(ticker)
            .cloned()
            .ok_or_else(|| MizanError::DataSource {
                reason: format!("no fundamentals for {}", ticker),
            })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reference "today" for the integration tests.
pub fn as_of() -> NaiveDate {
    date(2024, 6, 28)
}

/// Daily bars ending on `end`, one per calendar day. High/low sit 1% either
/// side of the close.
pub fn make_bars_ending(closes: &[f64], end: NaiveDate) -> Vec<PriceBar> {
    let n = closes.len() as i64;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: end - Duration::days(n - 1 - i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1_000_000,
        })
        .collect()
}

pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    make_bars_ending(closes, as_of())
}

/// Flat base, a jump to 200, then fourteen straight losses: RSI 0, price
/// still above EMA50, no MACD cross on the last bar. Scores +3.
pub fn buy_closes() -> Vec<f64> {
    let mut closes = vec![50.0; 40];
    closes.extend((0..16).map(|i| 200.0 - i as f64));
    closes
}

/// Mirror of [`buy_closes`]: RSI 100, price below EMA50. Scores -3.
pub fn sell_closes() -> Vec<f64> {
    let mut closes = vec![200.0; 40];
    closes.extend((0..16).map(|i| 50.0 + i as f64));
    closes
}

/// Constant price: RSI 50, MACD flat, close not above EMA50. Scores -1.
pub fn hold_closes(n: usize) -> Vec<f64> {
    vec![100.0; n]
}

pub fn compliant_fundamentals() -> FundamentalSnapshot {
    FundamentalSnapshot {
        company_name: Some("Apple Inc.".to_string()),
        sector: Some("Technology".to_string()),
        industry: Some("Consumer Electronics".to_string()),
        market_cap: Some(3_000_000_000_000.0),
        balance_sheet: Some(BalanceSheet {
            total_debt: Some(110_000_000_000.0),
            cash_and_equivalents: Some(30_000_000_000.0),
            short_term_investments: Some(35_000_000_000.0),
            net_receivables: Some(60_000_000_000.0),
            total_assets: Some(350_000_000_000.0),
        }),
        trailing_pe: Some(31.2),
        forward_pe: Some(28.4),
        revenue_growth: Some(0.05),
    }
}
