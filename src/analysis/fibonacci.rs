// src/analysis/fibonacci.rs
use crate::domain::models::{FibLevel, FibLevels, PriceBar, PriceSeries, FIB_RATIOS};

/// Retracement levels over the trailing `window` bars (whole series when `None`).
pub fn compute_fib_levels(series: &PriceSeries, window: Option<usize>) -> FibLevels {
    fib_levels_for(series.window(window))
}

/// Swing high/low of `bars` and the levels `high - (high - low) * ratio`.
///
/// `bars` must not be empty.
pub fn fib_levels_for(bars: &[PriceBar]) -> FibLevels {
    let swing_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let swing_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let range = swing_high - swing_low;

    let levels = FIB_RATIOS
        .iter()
        .map(|&(label, ratio)| FibLevel {
            label,
            ratio,
            price: swing_high - range * ratio,
        })
        .collect();

    FibLevels {
        swing_high,
        swing_low,
        levels,
    }
}
