// src/analysis/signals.rs
use crate::domain::models::{Classification, Indicators, Recommendation, Trend};
use serde::{Deserialize, Serialize};

/// RSI bounds for the overbought / oversold overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiThresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

/// Direction implied by the fast/slow EMA pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmaBias {
    Bullish,
    Bearish,
    Flat,
}

impl EmaBias {
    fn of(ema12: f64, ema26: f64) -> Self {
        let tolerance = 1e-9 * ema12.abs().max(ema26.abs()).max(1.0);
        if (ema12 - ema26).abs() <= tolerance {
            EmaBias::Flat
        } else if ema12 > ema26 {
            EmaBias::Bullish
        } else {
            EmaBias::Bearish
        }
    }

    fn trend(self) -> Trend {
        match self {
            EmaBias::Bullish => Trend::Uptrend,
            EmaBias::Bearish => Trend::Downtrend,
            EmaBias::Flat => Trend::Sideways,
        }
    }
}

/// Trend and recommendation from the indicator values.
///
/// Rules are evaluated in order and the first match wins:
/// 1. bullish EMAs and RSI below overbought: uptrend, buy
/// 2. bearish EMAs and RSI above oversold: downtrend, sell
/// 3. RSI at or above overbought: sell
/// 4. RSI at or below oversold: buy
/// 5. otherwise sideways, hold
pub fn classify(indicators: &Indicators, thresholds: &RsiThresholds) -> Classification {
    let Indicators { ema12, ema26, rsi } = *indicators;
    let bias = EmaBias::of(ema12, ema26);

    if bias == EmaBias::Bullish && rsi < thresholds.overbought {
        return Classification {
            trend: Trend::Uptrend,
            recommend: Recommendation::Buy,
            reason: format!(
                "EMA12 ({:.4}) is above EMA26 ({:.4}) and RSI {:.2} is not yet overbought (< {})",
                ema12, ema26, rsi, thresholds.overbought
            ),
        };
    }

    if bias == EmaBias::Bearish && rsi > thresholds.oversold {
        return Classification {
            trend: Trend::Downtrend,
            recommend: Recommendation::Sell,
            reason: format!(
                "EMA12 ({:.4}) is below EMA26 ({:.4}) and RSI {:.2} is not yet oversold (> {})",
                ema12, ema26, rsi, thresholds.oversold
            ),
        };
    }

    if rsi >= thresholds.overbought {
        return Classification {
            trend: bias.trend(),
            recommend: Recommendation::Sell,
            reason: format!(
                "RSI {:.2} is overbought (>= {}), taking profit outweighs the EMA signal",
                rsi, thresholds.overbought
            ),
        };
    }

    if rsi <= thresholds.oversold {
        return Classification {
            trend: bias.trend(),
            recommend: Recommendation::Buy,
            reason: format!(
                "RSI {:.2} is oversold (<= {}), buying the dip outweighs the EMA signal",
                rsi, thresholds.oversold
            ),
        };
    }

    Classification {
        trend: Trend::Sideways,
        recommend: Recommendation::Hold,
        reason: format!(
            "EMA12 and EMA26 are level and RSI {:.2} is neutral",
            rsi
        ),
    }
}
