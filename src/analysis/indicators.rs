// src/analysis/indicators.rs
use crate::domain::errors::{AnalysisError, EngineResult};
use crate::domain::models::{Indicators, PriceSeries};

pub const FAST_EMA_PERIOD: usize = 12;
pub const SLOW_EMA_PERIOD: usize = 26;
pub const RSI_PERIOD: usize = 14;

/// Smallest series the engine accepts: enough bars for the slow EMA seed and
/// for `RSI_PERIOD` price changes.
pub const MIN_SERIES_LEN: usize = max_usize(SLOW_EMA_PERIOD, RSI_PERIOD + 1);

const fn max_usize(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// Exponential Moving Average (EMA)
///
/// Seeded with the simple average of the first `period` prices, then smoothed with
/// `k = 2 / (period + 1)`. Element `i` of the result belongs to price `i + period - 1`.
pub fn calculate_ema(prices: &[f64], period: usize) -> EngineResult<Vec<f64>> {
    if period == 0 {
        return Err(AnalysisError::InvalidInput(
            "EMA period must be at least 1".to_string(),
        ));
    }
    if prices.len() < period {
        return Err(AnalysisError::InsufficientData {
            required: period,
            actual: prices.len(),
        });
    }

    let multiplier = 2.0 / (period + 1) as f64;
    let mut result = Vec::with_capacity(prices.len() - period + 1);

    // First EMA value is SMA, scaled before summing so large prices cannot overflow
    let first_sma = mean(&prices[..period]);
    result.push(first_sma);

    for &price in &prices[period..] {
        let previous_ema = result[result.len() - 1];
        result.push(price * multiplier + previous_ema * (1.0 - multiplier));
    }

    Ok(result)
}

/// Relative Strength Index (RSI) with Wilder's smoothing (`alpha = 1 / period`).
pub fn calculate_rsi(prices: &[f64], period: usize) -> EngineResult<f64> {
    if period == 0 {
        return Err(AnalysisError::InvalidInput(
            "RSI period must be at least 1".to_string(),
        ));
    }
    if prices.len() <= period {
        return Err(AnalysisError::InsufficientData {
            required: period + 1,
            actual: prices.len(),
        });
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip();

    let mut avg_gain = mean(&gains[..period]);
    let mut avg_loss = mean(&losses[..period]);

    // (avg * (period - 1) + x) / period, rearranged to stay in range
    for i in period..gains.len() {
        avg_gain += (gains[i] - avg_gain) / period as f64;
        avg_loss += (losses[i] - avg_loss) / period as f64;
    }

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - (100.0 / (1.0 + rs)))
}

/// Final EMA12, EMA26 and RSI14 values of the close prices.
pub fn compute_indicators(series: &PriceSeries) -> EngineResult<Indicators> {
    if series.len() < MIN_SERIES_LEN {
        return Err(AnalysisError::InsufficientData {
            required: MIN_SERIES_LEN,
            actual: series.len(),
        });
    }

    let closes = series.close_prices();
    let ema12 = last_value(&calculate_ema(&closes, FAST_EMA_PERIOD)?)?;
    let ema26 = last_value(&calculate_ema(&closes, SLOW_EMA_PERIOD)?)?;
    let rsi = calculate_rsi(&closes, RSI_PERIOD)?;

    log::debug!(
        "{} indicators: ema12={:.6} ema26={:.6} rsi={:.2}",
        series.symbol(),
        ema12,
        ema26,
        rsi
    );

    Ok(Indicators { ema12, ema26, rsi })
}

fn mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    values.iter().map(|v| v / n).sum()
}

fn last_value(values: &[f64]) -> EngineResult<f64> {
    values
        .last()
        .copied()
        .ok_or_else(|| AnalysisError::InvalidInput("empty indicator series".to_string()))
}
