// src/analysis/engine.rs
use crate::analysis::fibonacci::compute_fib_levels;
use crate::analysis::indicators::compute_indicators;
use crate::analysis::pressure::long_short_ratio;
use crate::analysis::signals::{classify, RsiThresholds};
use crate::analysis::targets::{compute_targets, DEFAULT_RISK_REWARD_MULTIPLE};
use crate::domain::errors::{AnalysisError, AppError, AppResult, EngineResult};
use crate::domain::models::{AnalysisResult, PriceSeries};
use serde::{Deserialize, Serialize};

/// Deployment-level tuning of the analysis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// RSI overbought / oversold bounds
    pub rsi: RsiThresholds,

    /// Take-profit distance as a multiple of the stop distance
    pub risk_reward_multiple: f64,

    /// Trailing bars used for the swing high/low and long/short ratio;
    /// `None` uses the whole series
    pub swing_window: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi: RsiThresholds::default(),
            risk_reward_multiple: DEFAULT_RISK_REWARD_MULTIPLE,
            swing_window: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> AppResult<()> {
        let RsiThresholds {
            overbought,
            oversold,
        } = self.rsi;
        if !(0.0..=100.0).contains(&overbought) || !(0.0..=100.0).contains(&oversold) {
            return Err(AppError::Config(format!(
                "RSI thresholds must lie in [0, 100], got overbought={} oversold={}",
                overbought, oversold
            )));
        }
        if oversold >= overbought {
            return Err(AppError::Config(format!(
                "RSI oversold ({}) must be below overbought ({})",
                oversold, overbought
            )));
        }
        if !self.risk_reward_multiple.is_finite() || self.risk_reward_multiple <= 0.0 {
            return Err(AppError::Config(format!(
                "Risk/reward multiple must be positive, got {}",
                self.risk_reward_multiple
            )));
        }
        if self.swing_window == Some(0) {
            return Err(AppError::Config(
                "Swing window must be at least 1 bar".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pure technical-analysis pipeline: indicators, Fibonacci levels,
/// classification and long-side targets for one price series.
///
/// Holds only immutable configuration, so one engine can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: EngineConfig,
}

impl AnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze `series`; `symbol` is used only to label the result.
    pub fn analyze(&self, series: &PriceSeries, symbol: &str) -> EngineResult<AnalysisResult> {
        let indicators = compute_indicators(series)?;
        let price = series.last().close;

        let fib = compute_fib_levels(series, self.config.swing_window);
        let long_short = long_short_ratio(series.window(self.config.swing_window));
        let classification = classify(&indicators, &self.config.rsi);
        let targets = compute_targets(price, &fib, self.config.risk_reward_multiple);

        let result = AnalysisResult {
            symbol: symbol.to_string(),
            price,
            ema12: indicators.ema12,
            ema26: indicators.ema26,
            rsi: indicators.rsi,
            fib,
            long_short,
            tp_long: targets.tp_long,
            sl_long: targets.sl_long,
            rr: targets.rr,
            trend: classification.trend,
            recommend: classification.recommend,
            reason: classification.reason,
            chart: None,
        };

        ensure_finite(&result)?;

        log::debug!(
            "{}: trend={} recommend={} tp={:.6} sl={:.6} rr={:.1}",
            symbol,
            result.trend,
            result.recommend,
            result.tp_long,
            result.sl_long,
            result.rr
        );

        Ok(result)
    }
}

/// Analyze with the default engine configuration.
pub fn analyze(series: &PriceSeries, symbol: &str) -> EngineResult<AnalysisResult> {
    AnalysisEngine::default().analyze(series, symbol)
}

fn ensure_finite(result: &AnalysisResult) -> EngineResult<()> {
    let mut fields = vec![
        ("price", result.price),
        ("ema12", result.ema12),
        ("ema26", result.ema26),
        ("rsi", result.rsi),
        ("long_short", result.long_short),
        ("tp_long", result.tp_long),
        ("sl_long", result.sl_long),
        ("rr", result.rr),
    ];
    fields.extend(result.fib.iter().map(|level| (level.label, level.price)));

    match fields.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(AnalysisError::NonFinite(format!(
            "{} evaluated to {} for {}",
            name, value, result.symbol
        ))),
        None => Ok(()),
    }
}
