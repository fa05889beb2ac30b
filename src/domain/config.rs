//! Typed settings built from a [`ConfigPort`], with validation.
//!
//! Every key is optional; absent keys fall back to the defaults below.

use crate::domain::compliance::ComplianceThresholds;
use crate::domain::error::MizanError;
use crate::domain::universe::{default_universe, parse_tickers};
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

pub const DEFAULT_SCAN_MIN_BARS: usize = 50;
pub const DEFAULT_SCAN_LOOKBACK_MONTHS: u32 = 6;
pub const DEFAULT_ANALYSIS_LOOKBACK_MONTHS: u32 = 12;
pub const DEFAULT_NARRATIVE_TAIL: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ScannerSettings {
    pub tickers: Vec<String>,
    pub min_bars: usize,
    pub lookback_months: u32,
    /// Worker threads; 0 means one per ticker, capped at the CPU count.
    pub workers: usize,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            tickers: default_universe(),
            min_bars: DEFAULT_SCAN_MIN_BARS,
            lookback_months: DEFAULT_SCAN_LOOKBACK_MONTHS,
            workers: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub lookback_months: u32,
    /// Indicator points handed to the narrator.
    pub narrative_tail: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            lookback_months: DEFAULT_ANALYSIS_LOOKBACK_MONTHS,
            narrative_tail: DEFAULT_NARRATIVE_TAIL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub scanner: ScannerSettings,
    pub analysis: AnalysisSettings,
    pub compliance: ComplianceThresholds,
}

pub fn load_settings(config: &dyn ConfigPort) -> Result<Settings, MizanError> {
    Ok(Settings {
        data_dir: config
            .get_string("data", "dir")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
        scanner: load_scanner(config)?,
        analysis: load_analysis(config)?,
        compliance: load_compliance(config)?,
    })
}

fn load_scanner(config: &dyn ConfigPort) -> Result<ScannerSettings, MizanError> {
    let defaults = ScannerSettings::default();

    let tickers = match config.get_string("scanner", "tickers") {
        Some(list) if !list.trim().is_empty() => parse_tickers(&list)?,
        _ => defaults.tickers,
    };

    let min_bars = config
        .get_usize("scanner", "min_bars")?
        .unwrap_or(defaults.min_bars);
    if min_bars < 2 {
        return Err(invalid("scanner", "min_bars", "min_bars must be at least 2"));
    }

    Ok(ScannerSettings {
        tickers,
        min_bars,
        lookback_months: load_months(config, "scanner", defaults.lookback_months)?,
        workers: config
            .get_usize("scanner", "workers")?
            .unwrap_or(defaults.workers),
    })
}

fn load_analysis(config: &dyn ConfigPort) -> Result<AnalysisSettings, MizanError> {
    let defaults = AnalysisSettings::default();
    let narrative_tail = config
        .get_usize("analysis", "narrative_tail")?
        .unwrap_or(defaults.narrative_tail);
    if narrative_tail == 0 {
        return Err(invalid(
            "analysis",
            "narrative_tail",
            "narrative_tail must be positive",
        ));
    }

    Ok(AnalysisSettings {
        lookback_months: load_months(config, "analysis", defaults.lookback_months)?,
        narrative_tail,
    })
}

fn load_months(config: &dyn ConfigPort, section: &str, default: u32) -> Result<u32, MizanError> {
    let months = config
        .get_usize(section, "lookback_months")?
        .unwrap_or(default as usize);
    if months == 0 || months > 120 {
        return Err(invalid(
            section,
            "lookback_months",
            "lookback_months must be between 1 and 120",
        ));
    }
    Ok(months as u32)
}

fn load_compliance(config: &dyn ConfigPort) -> Result<ComplianceThresholds, MizanError> {
    let defaults = ComplianceThresholds::default();
    Ok(ComplianceThresholds {
        max_debt_ratio: load_ratio(config, "max_debt_ratio", defaults.max_debt_ratio)?,
        max_cash_ratio: load_ratio(config, "max_cash_ratio", defaults.max_cash_ratio)?,
        max_receivables_ratio: load_ratio(
            config,
            "max_receivables_ratio",
            defaults.max_receivables_ratio,
        )?,
    })
}

fn load_ratio(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, MizanError> {
    let value = config.get_f64("compliance", key)?.unwrap_or(default);
    if !(value > 0.0 && value <= 1.0) {
        return Err(invalid(
            "compliance",
            key,
            &format!("{} must be in (0, 1]", key),
        ));
    }
    Ok(value)
}

fn invalid(section: &str, key: &str, reason: &str) -> MizanError {
    MizanError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
