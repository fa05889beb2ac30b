//! Single-ticker analysis: history, indicators, signal, compliance, narrative.

use crate::domain::compliance::{ComplianceScreener, ComplianceVerdict, FundamentalSnapshot};
use crate::domain::config::AnalysisSettings;
use crate::domain::error::MizanError;
use crate::domain::indicator::{compute_indicators, IndicatorSeries};
use crate::domain::narrative::{narrate_or_placeholder, Narrative, NarrativeContext};
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{generate_signal, Recommendation};
use crate::domain::universe::normalize_ticker;
use crate::ports::data_port::DataPort;
use crate::ports::narrative_port::NarrativePort;
use chrono::{Months, NaiveDate};
use tracing::{debug, warn};

/// Inclusive `(start, end)` dates covering `months` of history up to `as_of`.
/// `section` names the config section `months` came from, for the error.
pub fn history_window(
    as_of: NaiveDate,
    months: u32,
    section: &str,
) -> Result<(NaiveDate, NaiveDate), MizanError> {
    let start = as_of
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| MizanError::ConfigInvalid {
            section: section.to_string(),
            key: "lookback_months".to_string(),
            reason: format!("{} months before {} is out of range", months, as_of),
        })?;
    Ok((start, as_of))
}

#[derive(Debug, Clone)]
pub struct TickerAnalysis {
    pub ticker: String,
    pub last_bar: PriceBar,
    pub indicators: IndicatorSeries,
    pub recommendation: Recommendation,
    pub fundamentals: FundamentalSnapshot,
    pub compliance: ComplianceVerdict,
    pub narrative: Narrative,
}

/// Everything the dashboard needs for one ticker. Fundamentals problems
/// degrade to an indeterminate verdict; price-history problems are errors.
pub fn analyze_ticker(
    data: &dyn DataPort,
    screener: &ComplianceScreener,
    narrator: Option<&dyn NarrativePort>,
    ticker: &str,
    as_of: NaiveDate,
    settings: &AnalysisSettings,
) -> Result<TickerAnalysis, MizanError> {
    let ticker = normalize_ticker(ticker)?;
    let (start, end) = history_window(as_of, settings.lookback_months, "analysis")?;

    let bars = data.fetch_history(&ticker, start, end)?;
    debug!(%ticker, bars = bars.len(), %start, %end, "history fetched");
    let last_bar = match bars.last() {
        Some(bar) if bars.len() >= 2 => bar.clone(),
        _ => return Err(MizanError::insufficient(&ticker, bars.len(), 2)),
    };

    let indicators = compute_indicators(&bars)?;
    let recommendation = generate_signal(&indicators)?;

    let (fundamentals, compliance) = match data.fetch_fundamentals(&ticker) {
        Ok(snapshot) => {
            let verdict = screener.screen(&snapshot);
            (snapshot, verdict)
        }
        Err(e) => {
            warn!(%ticker, error = %e, "fundamentals unavailable");
            (
                FundamentalSnapshot::default(),
                ComplianceVerdict::indeterminate(format!("fundamentals unavailable: {}", e)),
            )
        }
    };

    let context = NarrativeContext {
        ticker: ticker.clone(),
        fundamentals,
        recent: indicators.tail(settings.narrative_tail),
        compliance,
        recommendation,
    };
    let narrative = narrate_or_placeholder(narrator, &context);

    let NarrativeContext {
        fundamentals,
        compliance,
        ..
    } = context;

    Ok(TickerAnalysis {
        ticker,
        last_bar,
        indicators,
        recommendation,
        fundamentals,
        compliance,
        narrative,
    })
}

/// Compliance screen alone. Unlike [`analyze_ticker`], a fundamentals fetch
/// failure is returned to the caller.
pub fn screen_ticker(
    data: &dyn DataPort,
    screener: &ComplianceScreener,
    ticker: &str,
) -> Result<(FundamentalSnapshot, ComplianceVerdict), MizanError> {
    let ticker = normalize_ticker(ticker)?;
    let snapshot = data.fetch_fundamentals(&ticker)?;
    let verdict = screener.screen(&snapshot);
    Ok((snapshot, verdict))
}
