//! Rule-based trade signal from the last two indicator points.
//!
//! Score components:
//! - RSI(14) below 30: +2, above 70: -2
//! - MACD crossing above its signal line: +2, crossing below: -2
//! - Close above EMA(50): +1, otherwise -1 (undefined EMA counts as not above)
//!
//! score >= 2 is a Buy, score <= -2 a Sell, anything else a Hold. Directional
//! signals carry entry/stop/target levels sized by ATR(14) at 1:2 risk/reward.

use crate::domain::error::MizanError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries};
use chrono::NaiveDate;
use std::fmt;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const BUY_SCORE: i32 = 2;
pub const SELL_SCORE: i32 = -2;
pub const STOP_ATR_MULTIPLE: f64 = 2.0;
pub const TARGET_ATR_MULTIPLE: f64 = 4.0;
/// Volatility proxy, as a fraction of the close, when ATR is undefined.
pub const FALLBACK_VOLATILITY: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeSignal {
    Buy(TradeLevels),
    Sell(TradeLevels),
    Hold,
}

impl TradeSignal {
    pub fn levels(&self) -> Option<&TradeLevels> {
        match self {
            TradeSignal::Buy(levels) | TradeSignal::Sell(levels) => Some(levels),
            TradeSignal::Hold => None,
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, TradeSignal::Buy(_))
    }

    pub fn arabic_label(&self) -> &'static str {
        match self {
            TradeSignal::Buy(_) => "شراء",
            TradeSignal::Sell(_) => "بيع",
            TradeSignal::Hold => "انتظار/مراقبة",
        }
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSignal::Buy(_) => write!(f, "Buy"),
            TradeSignal::Sell(_) => write!(f, "Sell"),
            TradeSignal::Hold => write!(f, "Hold"),
        }
    }
}

/// Per-rule contributions to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub rsi: i32,
    pub macd_cross: i32,
    pub trend: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.rsi + self.macd_cross + self.trend
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub date: NaiveDate,
    pub close: f64,
    pub score: i32,
    pub breakdown: ScoreBreakdown,
    pub signal: TradeSignal,
}

/// Score the most recent bar of `indicators` against the one before it.
pub fn generate_signal(indicators: &IndicatorSeries) -> Result<Recommendation, MizanError> {
    let n = indicators.len();
    if n < 2 {
        return Err(MizanError::insufficient("signal generation", n, 2));
    }
    match (indicators.point(n - 2), indicators.point(n - 1)) {
        (Some(prior), Some(latest)) => Ok(evaluate(&prior, &latest)),
        _ => Err(MizanError::insufficient("signal generation", n, 2)),
    }
}

/// Pure scoring rule over two consecutive points.
pub fn evaluate(prior: &IndicatorPoint, latest: &IndicatorPoint) -> Recommendation {
    let breakdown = ScoreBreakdown {
        rsi: rsi_score(latest.rsi14),
        macd_cross: macd_cross_score(prior, latest),
        trend: if latest.close > latest.ema50 { 1 } else { -1 },
    };
    let score = breakdown.total();

    let signal = if score >= BUY_SCORE {
        TradeSignal::Buy(levels(latest, 1.0))
    } else if score <= SELL_SCORE {
        TradeSignal::Sell(levels(latest, -1.0))
    } else {
        TradeSignal::Hold
    };

    Recommendation {
        date: latest.date,
        close: latest.close,
        score,
        breakdown,
        signal,
    }
}

fn rsi_score(rsi: f64) -> i32 {
    if rsi < RSI_OVERSOLD {
        2
    } else if rsi > RSI_OVERBOUGHT {
        -2
    } else {
        0
    }
}

fn macd_cross_score(prior: &IndicatorPoint, latest: &IndicatorPoint) -> i32 {
    if latest.macd > latest.macd_signal && prior.macd <= prior.macd_signal {
        2
    } else if latest.macd < latest.macd_signal && prior.macd >= prior.macd_signal {
        -2
    } else {
        0
    }
}

/// `direction` is +1 for long, -1 for short.
fn levels(latest: &IndicatorPoint, direction: f64) -> TradeLevels {
    let close = latest.close;
    let atr = if latest.atr14.is_nan() {
        close * FALLBACK_VOLATILITY
    } else {
        latest.atr14
    };
    TradeLevels {
        entry: close,
        stop_loss: close - direction * STOP_ATR_MULTIPLE * atr,
        take_profit: close + direction * TARGET_ATR_MULTIPLE * atr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point(close: f64) -> IndicatorPoint {
        IndicatorPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            close,
            ema20: close,
            ema50: close,
            rsi14: 50.0,
            macd: 0.0,
            macd_signal: 0.0,
            atr14: 1.5,
        }
    }

    #[test]
    fn oversold_and_above_trend_is_buy() {
        let prior = point(100.0);
        let latest = IndicatorPoint {
            rsi14: 25.0,
            ema50: 95.0,
            ..point(100.0)
        };
        let rec = evaluate(&prior, &latest);

        assert_eq!(rec.score, 3);
        assert_eq!(
            rec.signal,
            TradeSignal::Buy(TradeLevels {
                entry: 100.0,
                stop_loss: 97.0,
                take_profit: 106.0,
            })
        );
    }

    #[test]
    fn overbought_below_trend_is_sell() {
        let prior = point(100.0);
        let latest = IndicatorPoint {
            rsi14: 75.0,
            ema50: 105.0,
            ..point(100.0)
        };
        let rec = evaluate(&prior, &latest);

        assert_eq!(rec.score, -3);
        let levels = rec.signal.levels().unwrap();
        assert_relative_eq!(levels.entry, 100.0);
        assert_relative_eq!(levels.stop_loss, 103.0);
        assert_relative_eq!(levels.take_profit, 94.0);
        assert_eq!(rec.signal.to_string(), "Sell");
    }

    #[test]
    fn bullish_cross_detected() {
        let prior = IndicatorPoint {
            macd: -0.5,
            macd_signal: -0.2,
            ..point(100.0)
        };
        let latest = IndicatorPoint {
            macd: 0.3,
            macd_signal: 0.1,
            ema50: 99.0,
            ..point(100.0)
        };
        let rec = evaluate(&prior, &latest);
        assert_eq!(rec.breakdown.macd_cross, 2);
        assert_eq!(rec.breakdown.trend, 1);
        assert!(rec.signal.is_buy());
    }

    #[test]
    fn touching_prior_counts_as_cross() {
        let prior = IndicatorPoint {
            macd: 0.2,
            macd_signal: 0.2,
            ..point(100.0)
        };
        let latest = IndicatorPoint {
            macd: 0.1,
            macd_signal: 0.3,
            ..point(100.0)
        };
        assert_eq!(evaluate(&prior, &latest).breakdown.macd_cross, -2);
    }

    #[test]
    fn bearish_cross_alone_is_sell() {
        // -2 (cross) + -1 (close not above EMA) = -3
        let prior = IndicatorPoint {
            macd: 0.5,
            macd_signal: 0.1,
            ..point(100.0)
        };
        let latest = IndicatorPoint {
            macd: 0.0,
            macd_signal: 0.2,
            ..point(100.0)
        };
        let rec = evaluate(&prior, &latest);
        assert_eq!(rec.score, -3);
        assert!(matches!(rec.signal, TradeSignal::Sell(_)));
    }

    #[test]
    fn flat_point_is_hold() {
        let rec = evaluate(&point(100.0), &point(100.0));
        assert_eq!(rec.score, -1);
        assert_eq!(rec.signal, TradeSignal::Hold);
        assert!(rec.signal.levels().is_none());
    }

    #[test]
    fn undefined_inputs_score_conservatively() {
        let nan_point = IndicatorPoint {
            rsi14: f64::NAN,
            macd_signal: f64::NAN,
            ema50: f64::NAN,
            ..point(100.0)
        };
        let rec = evaluate(&nan_point, &nan_point);
        assert_eq!(
            rec.breakdown,
            ScoreBreakdown {
                rsi: 0,
                macd_cross: 0,
                trend: -1
            }
        );
        assert_eq!(rec.signal, TradeSignal::Hold);
    }

    #[test]
    fn missing_atr_falls_back_to_two_percent() {
        let latest = IndicatorPoint {
            rsi14: 20.0,
            atr14: f64::NAN,
            ema50: 150.0,
            ..point(200.0)
        };
        let rec = evaluate(&point(200.0), &latest);

        // 2% of 200 = 4
        let levels = rec.signal.levels().unwrap();
        assert_relative_eq!(levels.stop_loss, 192.0);
        assert_relative_eq!(levels.take_profit, 216.0);
    }

    #[test]
    fn arabic_labels() {
        assert_eq!(TradeSignal::Hold.arabic_label(), "انتظار/مراقبة");
    }
}
