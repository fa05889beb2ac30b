//! Ticker lists: normalisation, parsing, and the default scan universe.

use crate::domain::error::MizanError;
use std::collections::HashSet;

/// Large-cap US technology names scanned when no list is configured.
pub const DEFAULT_UNIVERSE: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "AMD", "NFLX", "INTC",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),

    #[error("invalid ticker '{0}': expected letters, digits, '.' or '-'")]
    InvalidTicker(String),
}

impl From<UniverseError> for MizanError {
    fn from(err: UniverseError) -> Self {
        MizanError::TickerList {
            reason: err.to_string(),
        }
    }
}

pub fn default_universe() -> Vec<String> {
    DEFAULT_UNIVERSE.iter().map(|t| t.to_string()).collect()
}

/// Trim and upper-case a ticker, rejecting empty or oddly formed symbols.
pub fn normalize_ticker(raw: &str) -> Result<String, UniverseError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(UniverseError::EmptyToken);
    }
    if !ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(UniverseError::InvalidTicker(raw.trim().to_string()));
    }
    Ok(ticker)
}

/// Parse a comma-separated ticker list, keeping input order.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let ticker = normalize_ticker(token)?;
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let result = parse_tickers("AAPL,MSFT,NVDA").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn parse_trims_and_uppercases() {
        let result = parse_tickers("  aapl , Msft ,brk.b").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT", "BRK.B"]);
    }

    #[test]
    fn parse_empty_token() {
        assert_eq!(parse_tickers("AAPL,,MSFT"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_tickers(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_duplicate() {
        let result = parse_tickers("AAPL,MSFT,aapl");
        assert!(matches!(result, Err(UniverseError::DuplicateTicker(s)) if s == "AAPL"));
    }

    #[test]
    fn normalize_rejects_symbols() {
        assert!(matches!(
            normalize_ticker("AA PL"),
            Err(UniverseError::InvalidTicker(_))
        ));
        assert_eq!(normalize_ticker(" tsla ").unwrap(), "TSLA");
    }

    #[test]
    fn default_universe_has_ten_unique_tickers() {
        let universe = default_universe();
        assert_eq!(universe.len(), 10);
        let joined = universe.join(",");
        assert_eq!(parse_tickers(&joined).unwrap(), universe);
    }

    #[test]
    fn universe_error_maps_to_ticker_list() {
        let err: MizanError = UniverseError::EmptyToken.into();
        assert!(matches!(err, MizanError::TickerList { .. }));
    }
}
