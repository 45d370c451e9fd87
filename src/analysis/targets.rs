// src/analysis/targets.rs
use crate::domain::models::{FibLevels, Targets};

pub const DEFAULT_RISK_REWARD_MULTIPLE: f64 = 2.0;

/// Long-side take-profit, stop-loss and risk/reward percentage.
///
/// The stop sits on the nearest Fibonacci level strictly below `last_close`
/// (the swing low when no level is below it). The take-profit is placed
/// `multiple` times the risk above the entry.
pub fn compute_targets(last_close: f64, fib: &FibLevels, multiple: f64) -> Targets {
    let sl_long = fib
        .iter()
        .map(|level| level.price)
        .filter(|&price| price < last_close)
        .fold(None, |best: Option<f64>, price| {
            Some(best.map_or(price, |b| b.max(price)))
        })
        .unwrap_or(fib.swing_low);

    let risk = last_close - sl_long;
    let tp_long = last_close + risk * multiple;

    Targets {
        tp_long,
        sl_long,
        rr: risk_reward(last_close, tp_long, sl_long),
    }
}

/// `(tp - entry) / (entry - sl) * 100`, or 0 when the stop is on the entry.
pub fn risk_reward(entry: f64, tp_long: f64, sl_long: f64) -> f64 {
    let risk = entry - sl_long;
    if risk.abs() <= f64::EPSILON * entry.abs().max(1.0) {
        return 0.0;
    }
    (tp_long - entry) / risk * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fibonacci::fib_levels_for;
    use crate::domain::models::PriceBar;
    use approx::assert_relative_eq;

    fn levels(low: f64, high: f64) -> FibLevels {
        fib_levels_for(&[
            PriceBar::new(0, low, low, low, low, 1.0),
            PriceBar::new(1, high, high, high, high, 1.0),
        ])
    }

    #[test]
    fn stop_uses_nearest_level_below_close() {
        // 100..110: levels 107.64, 106.18, 105, 103.82
        let fib = levels(100.0, 110.0);
        let targets = compute_targets(106.0, &fib, 2.0);
        assert_relative_eq!(targets.sl_long, 105.0);
        assert_relative_eq!(targets.tp_long, 108.0);
        assert_relative_eq!(targets.rr, 200.0);
    }

    #[test]
    fn stop_falls_back_to_swing_low() {
        let fib = levels(100.0, 110.0);
        let targets = compute_targets(102.0, &fib, 2.0);
        assert_eq!(targets.sl_long, 100.0);
        assert_relative_eq!(targets.tp_long, 106.0);
    }

    #[test]
    fn close_above_all_levels_uses_top_level() {
        let fib = levels(100.0, 110.0);
        let targets = compute_targets(110.0, &fib, 3.0);
        assert_relative_eq!(targets.sl_long, 107.64, epsilon = 1e-9);
        assert_relative_eq!(targets.rr, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_stop_gives_zero_rr() {
        let fib = levels(50.0, 50.0);
        let targets = compute_targets(50.0, &fib, 2.0);
        assert_eq!(targets.sl_long, 50.0);
        assert_eq!(targets.tp_long, 50.0);
        assert_eq!(targets.rr, 0.0);
    }

    #[test]
    fn rr_recomputes_from_targets() {
        let fib = levels(1.0, 3.5);
        let close = 3.1;
        let t = compute_targets(close, &fib, 2.5);
        let expected = (t.tp_long - close) / (close - t.sl_long) * 100.0;
        assert_relative_eq!(t.rr, expected, epsilon = 1e-9);
    }
}
