//! Inputs and fallbacks for narrating an analysis in prose.

use crate::domain::compliance::{ComplianceVerdict, FundamentalSnapshot};
use crate::domain::indicator::IndicatorPoint;
use crate::domain::signal::Recommendation;
use crate::ports::narrative_port::NarrativePort;
use tracing::warn;

/// Shown in place of a narrative when no narrator is available or it fails.
pub const UNAVAILABLE_PLACEHOLDER: &str =
    "ملاحظة: خدمة التحليل بالذكاء الاصطناعي غير متوفرة حالياً. يتم عرض التحليل الفني فقط.";

/// Structured facts handed to a narrator.
#[derive(Debug, Clone)]
pub struct NarrativeContext {
    pub ticker: String,
    pub fundamentals: FundamentalSnapshot,
    /// Most recent indicator points, oldest first. Never empty.
    pub recent: Vec<IndicatorPoint>,
    pub compliance: ComplianceVerdict,
    pub recommendation: Recommendation,
}

impl NarrativeContext {
    pub fn latest(&self) -> Option<&IndicatorPoint> {
        self.recent.last()
    }

    pub fn display_name(&self) -> &str {
        self.fundamentals
            .company_name
            .as_deref()
            .unwrap_or(&self.ticker)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Narrative {
    Generated(String),
    Unavailable(String),
}

impl Narrative {
    pub fn text(&self) -> &str {
        match self {
            Narrative::Generated(text) | Narrative::Unavailable(text) => text,
        }
    }
}

/// Run the narrator if there is one. Failures degrade to the placeholder.
pub fn narrate_or_placeholder(
    narrator: Option<&dyn NarrativePort>,
    context: &NarrativeContext,
) -> Narrative {
    let Some(narrator) = narrator else {
        return Narrative::Unavailable(UNAVAILABLE_PLACEHOLDER.to_string());
    };
    match narrator.narrate(context) {
        Ok(text) if !text.trim().is_empty() => Narrative::Generated(text),
        Ok(_) => {
            warn!(ticker = %context.ticker, "narrator returned empty text");
            Narrative::Unavailable(UNAVAILABLE_PLACEHOLDER.to_string())
        }
        Err(e) => {
            warn!(ticker = %context.ticker, error = %e, "narration failed");
            Narrative::Unavailable(UNAVAILABLE_PLACEHOLDER.to_string())
        }
    }
}

/// The user prompt for a hosted language model, asking for an Arabic write-up.
pub fn build_prompt(context: &NarrativeContext) -> String {
    let f = &context.fundamentals;
    let mut prompt = format!(
        "Analyze the US stock {} ({}).\n\
         Financial Profile:\n\
         - Sector: {}\n\
         - Revenue Growth: {}\n\
         - Forward P/E: {}\n\
         - Shariah Status: {} ({})\n",
        context.ticker,
        context.display_name(),
        f.sector.as_deref().unwrap_or("N/A"),
        fmt_opt(f.revenue_growth),
        fmt_opt(f.forward_pe),
        context.compliance.status,
        context.compliance.reason,
    );

    if let Some(p) = context.latest() {
        prompt.push_str(&format!(
            "\nTechnical Indicators:\n\
             - Current Price: {:.2}\n\
             - RSI: {}\n\
             - MACD: {}\n",
            p.close,
            fmt_value(p.rsi14),
            fmt_value(p.macd),
        ));
    }

    prompt.push_str(&format!(
        "- Rule-based signal: {} (score {})\n\
         \nPlease provide a detailed investment recommendation in Arabic.\n\
         Focus on:\n\
         1. Business fundamentals.\n\
         2. Impact of Shariah compliance on long-term holding.\n\
         3. Risk factors.\n\
         4. Final verdict (Buy/Sell/Hold).\n\
         Keep it professional and concise.\n",
        context.recommendation.signal, context.recommendation.score,
    ));

    prompt
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(fmt_value).unwrap_or_else(|| "N/A".to_string())
}

pub(crate) fn fmt_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "N/A".to_string()
    }
}
