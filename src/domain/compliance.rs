//! Shariah compliance screen.
//!
//! Two stages: a business-activity gate on sector/industry, then three
//! financial ratios from the latest quarterly balance sheet. The screen is a
//! pure function of its inputs and never fails; missing data yields
//! [`ComplianceStatus::Indeterminate`].

use std::fmt;

/// Sector and industry names excluded outright. Matched exactly against the
/// data provider's classification strings.
pub const PROHIBITED_CLASSIFICATIONS: [&str; 8] = [
    "Banks",
    "Regional Banks",
    "Financial Services",
    "Insurance",
    "Tobacco",
    "Gambling",
    "Alcohol",
    "Adult Entertainment",
];

/// Latest-quarter balance sheet line items. Absent items count as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSheet {
    pub total_debt: Option<f64>,
    pub cash_and_equivalents: Option<f64>,
    pub short_term_investments: Option<f64>,
    pub net_receivables: Option<f64>,
    pub total_assets: Option<f64>,
}

impl BalanceSheet {
    pub fn is_empty(&self) -> bool {
        self.total_debt.is_none()
            && self.cash_and_equivalents.is_none()
            && self.short_term_investments.is_none()
            && self.net_receivables.is_none()
            && self.total_assets.is_none()
    }
}

/// Point-in-time fundamentals for one ticker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalSnapshot {
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub balance_sheet: Option<BalanceSheet>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub revenue_growth: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceThresholds {
    pub max_debt_ratio: f64,
    pub max_cash_ratio: f64,
    pub max_receivables_ratio: f64,
}

impl Default for ComplianceThresholds {
    fn default() -> Self {
        Self {
            max_debt_ratio: 0.33,
            max_cash_ratio: 0.33,
            max_receivables_ratio: 0.49,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    Indeterminate,
}

impl ComplianceStatus {
    pub fn arabic_label(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "متوافق مع الشريعة",
            ComplianceStatus::NonCompliant => "غير متوافق شرعاً",
            ComplianceStatus::Indeterminate => "تعذر جلب البيانات الشرعية",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "Compliant"),
            ComplianceStatus::NonCompliant => write!(f, "Non-Compliant"),
            ComplianceStatus::Indeterminate => write!(f, "Indeterminate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceRatios {
    /// total debt / market cap
    pub debt: f64,
    /// (cash + short-term investments) / market cap
    pub cash_and_interest: f64,
    /// net receivables / max(total assets, 1)
    pub receivables: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceVerdict {
    pub status: ComplianceStatus,
    pub reason: String,
    pub ratios: Option<ComplianceRatios>,
}

impl ComplianceVerdict {
    pub fn indeterminate(reason: impl Into<String>) -> Self {
        Self {
            status: ComplianceStatus::Indeterminate,
            reason: reason.into(),
            ratios: None,
        }
    }

    fn non_compliant_sector(value: &str) -> Self {
        Self {
            status: ComplianceStatus::NonCompliant,
            reason: format!("non-compliant sector: {}", value),
            ratios: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceScreener {
    thresholds: ComplianceThresholds,
}

impl ComplianceScreener {
    pub fn new(thresholds: ComplianceThresholds) -> Self {
        Self { thresholds }
    }

    pub fn screen(&self, snapshot: &FundamentalSnapshot) -> ComplianceVerdict {
        let classifications = [snapshot.sector.as_deref(), snapshot.industry.as_deref()];
        if let Some(hit) = classifications
            .into_iter()
            .flatten()
            .find(|c| PROHIBITED_CLASSIFICATIONS.contains(c))
        {
            return ComplianceVerdict::non_compliant_sector(hit);
        }

        let market_cap = match snapshot.market_cap {
            Some(cap) if cap.is_finite() && cap > 0.0 => cap,
            _ => return ComplianceVerdict::indeterminate("market capitalization unavailable"),
        };

        let sheet = match &snapshot.balance_sheet {
            Some(sheet) if !sheet.is_empty() => sheet,
            _ => return ComplianceVerdict::indeterminate("balance sheet unavailable"),
        };

        let ratios = match compute_ratios(market_cap, sheet) {
            Ok(r) => r,
            Err(reason) => return ComplianceVerdict::indeterminate(reason),
        };

        let t = &self.thresholds;
        let breaches: Vec<String> = [
            ("Debt/MarketCap", ratios.debt, t.max_debt_ratio),
            ("Cash+Interest/MarketCap", ratios.cash_and_interest, t.max_cash_ratio),
            ("Receivables/TotalAssets", ratios.receivables, t.max_receivables_ratio),
        ]
        .into_iter()
        .filter(|(_, value, limit)| value >= limit)
        .map(|(name, value, limit)| {
            format!("{} {} (limit {})", name, percent(value), percent(limit))
        })
        .collect();

        if breaches.is_empty() {
            ComplianceVerdict {
                status: ComplianceStatus::Compliant,
                reason: "compliant: all ratios within limits".to_string(),
                ratios: Some(ratios),
            }
        } else {
            ComplianceVerdict {
                status: ComplianceStatus::NonCompliant,
                reason: format!("non-compliant: {}", breaches.join(", ")),
                ratios: Some(ratios),
            }
        }
    }
}

/// Screen with the default thresholds.
pub fn screen_compliance(snapshot: &FundamentalSnapshot) -> ComplianceVerdict {
    ComplianceScreener::default().screen(snapshot)
}

fn compute_ratios(market_cap: f64, sheet: &BalanceSheet) -> Result<ComplianceRatios, String> {
    let item = |v: Option<f64>| v.unwrap_or(0.0);

    let ratios = ComplianceRatios {
        debt: item(sheet.total_debt) / market_cap,
        cash_and_interest: (item(sheet.cash_and_equivalents)
            + item(sheet.short_term_investments))
            / market_cap,
        receivables: item(sheet.net_receivables) / item(sheet.total_assets).max(1.0),
    };

    for (name, value) in [
        ("debt ratio", ratios.debt),
        ("cash and interest ratio", ratios.cash_and_interest),
        ("receivables ratio", ratios.receivables),
    ] {
        if !value.is_finite() {
            return Err(format!("ratio computation failed: {} is not a finite number", name));
        }
    }

    Ok(ratios)
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
