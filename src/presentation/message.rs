// src/presentation/message.rs
use crate::domain::models::AnalysisResult;
use std::fmt;

/// Chat message view of an analysis.
///
/// Prices use 4 decimals, RSI and the long/short ratio 2, and the
/// risk-reward percentage 1.
pub struct AnalysisMessage<'a> {
    result: &'a AnalysisResult,
    display_symbol: &'a str,
}

impl<'a> AnalysisMessage<'a> {
    pub fn new(result: &'a AnalysisResult, display_symbol: &'a str) -> Self {
        Self {
            result,
            display_symbol,
        }
    }
}

impl fmt::Display for AnalysisMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let r = self.result;

        writeln!(f, "📈 **Analysis {}**", self.display_symbol.to_uppercase())?;
        writeln!(f, "💰 Current price: ${:.4}", r.price)?;
        writeln!(f)?;

        writeln!(f, "📊 **Indicators:**")?;
        writeln!(f, "• EMA12: {:.4} | EMA26: {:.4}", r.ema12, r.ema26)?;
        writeln!(f, "• RSI: {:.2}", r.rsi)?;
        writeln!(f)?;

        writeln!(f, "🌀 **Fibonacci Levels (Retracement):**")?;
        for level in r.fib.iter() {
            writeln!(f, "• {}: ${:.4}", level.label, level.price)?;
        }
        writeln!(f)?;

        writeln!(f, "⚖️ **Long/Short Ratio:** {:.2}x", r.long_short)?;
        writeln!(
            f,
            "🎯 **Long setup:** TP: ${:.4} | SL: ${:.4} | RR: {:.1}%",
            r.tp_long, r.sl_long, r.rr
        )?;
        writeln!(f)?;

        writeln!(f, "🔮 **Trend:** {} | **Recommendation:** {}", r.trend, r.recommend)?;
        writeln!(f, "📝 **Reason:** {}", r.reason)?;
        writeln!(f)?;

        writeln!(f, "⚠️ **Warning:** If RSI >70, sell fast! If <30, buy the dip.")
    }
}

/// Render an analysis as the chat message shown to users
pub fn format_analysis_message(result: &AnalysisResult, display_symbol: &str) -> String {
    AnalysisMessage::new(result, display_symbol).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FibLevel, FibLevels, Recommendation, Trend};

    fn sample() -> AnalysisResult {
        AnalysisResult {
            symbol: "BTCUSDT".to_string(),
            price: 110.0,
            ema12: 107.123456,
            ema26: 104.5,
            rsi: 72.3456,
            fib: FibLevels {
                swing_high: 110.0,
                swing_low: 100.0,
                levels: vec![
                    FibLevel { label: "23.6%", ratio: 0.236, price: 107.64 },
                    FibLevel { label: "38.2%", ratio: 0.382, price: 106.18 },
                    FibLevel { label: "50%", ratio: 0.5, price: 105.0 },
                    FibLevel { label: "61.8%", ratio: 0.618, price: 103.82 },
                ],
            },
            long_short: 1.5,
            tp_long: 114.72,
            sl_long: 107.64,
            rr: 200.0,
            trend: Trend::Uptrend,
            recommend: Recommendation::Sell,
            reason: "Uptrend but RSI is overbought".to_string(),
            chart: None,
        }
    }

    #[test]
    fn formats_every_section() {
        let msg = format_analysis_message(&sample(), "btc");

        assert!(msg.contains("Analysis BTC"));
        assert!(msg.contains("Current price: $110.0000"));
        assert!(msg.contains("EMA12: 107.1235 | EMA26: 104.5000"));
        assert!(msg.contains("RSI: 72.35"));
        assert!(msg.contains("Long/Short Ratio:** 1.50x"));
        assert!(msg.contains("TP: $114.7200 | SL: $107.6400 | RR: 200.0%"));
        assert!(msg.contains("**Trend:** uptrend | **Recommendation:** sell"));
        assert!(msg.contains("Reason:** Uptrend but RSI is overbought"));
        assert!(msg.contains("If RSI >70"));
    }

    #[test]
    fn message_view_matches_formatted_string() {
        let result = sample();
        let msg = AnalysisMessage::new(&result, "btc").to_string();
        assert_eq!(msg, format_analysis_message(&result, "btc"));
        assert!(msg.starts_with("📈 **Analysis BTC**\n"));
        assert!(msg.ends_with("buy the dip.\n"));
    }

    #[test]
    fn lists_fib_levels_in_ratio_order() {
        let msg = format_analysis_message(&sample(), "BTC");
        let positions: Vec<usize> = ["23.6%: $107.6400", "38.2%: $106.1800", "50%: $105.0000", "61.8%: $103.8200"]
            .iter()
            .map(|line| msg.find(line).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
