//! Offline narrator: a deterministic plain-text summary built from the
//! analysis facts. Stands in when no hosted model is configured.

use crate::domain::compliance::ComplianceStatus;
use crate::domain::error::MizanError;
use crate::domain::narrative::{fmt_value, NarrativeContext};
use crate::domain::signal::TradeSignal;
use crate::ports::narrative_port::NarrativePort;

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryNarrator;

impl NarrativePort for SummaryNarrator {
    fn narrate(&self, context: &NarrativeContext) -> Result<String, MizanError> {
        let latest = context.latest().ok_or_else(|| MizanError::Narrative {
            reason: "no indicator points to summarise".to_string(),
        })?;

        let mut lines = vec![format!(
            "{} closed at {:.2} on {}.",
            context.display_name(),
            latest.close,
            latest.date
        )];

        let momentum = match latest.rsi14 {
            r if r < 30.0 => "oversold",
            r if r > 70.0 => "overbought",
            r if r.is_finite() => "neutral",
            _ => "not yet measurable",
        };
        lines.push(format!(
            "RSI(14) is {} ({}); MACD {} against a signal line of {}.",
            fmt_value(latest.rsi14),
            momentum,
            fmt_value(latest.macd),
            fmt_value(latest.macd_signal),
        ));

        let trend = if latest.close > latest.ema50 {
            "above"
        } else {
            "at or below"
        };
        lines.push(format!(
            "Price is {} its 50-day EMA ({}).",
            trend,
            fmt_value(latest.ema50)
        ));

        let rec = &context.recommendation;
        lines.push(match rec.signal {
            TradeSignal::Hold => format!("Signal: Hold (score {}).", rec.score),
            TradeSignal::Buy(l) | TradeSignal::Sell(l) => format!(
                "Signal: {} (score {}), entry {:.2}, stop {:.2}, target {:.2}.",
                rec.signal, rec.score, l.entry, l.stop_loss, l.take_profit
            ),
        });

        let compliance = &context.compliance;
        lines.push(match compliance.status {
            ComplianceStatus::Indeterminate => {
                format!("Shariah screen inconclusive: {}.", compliance.reason)
            }
            _ => format!("Shariah screen: {} ({}).", compliance.status, compliance.reason),
        });

        Ok(lines.join("\n"))
    }
}
