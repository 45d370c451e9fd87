//! Property and regression tests for the analysis engine

use approx::assert_relative_eq;
use coin_analyst::analysis::{analyze, AnalysisEngine, EngineConfig, MIN_SERIES_LEN};
use coin_analyst::domain::{AnalysisError, PriceBar, PriceSeries, Recommendation};
use proptest::prelude::*;

const HOUR_MS: i64 = 3_600_000;

/// Build a valid series from per-bar close moves, wick sizes and volumes
fn series_from_moves(moves: &[(f64, f64, f64)]) -> PriceSeries {
    let mut prev_close = 1_000.0;
    let bars = moves
        .iter()
        .enumerate()
        .map(|(i, &(step, wick, volume))| {
            let open = prev_close;
            let close = open + step;
            prev_close = close;
            PriceBar::new(
                i as i64 * HOUR_MS,
                open,
                open.max(close) + wick,
                open.min(close) - wick,
                close,
                volume,
            )
        })
        .collect();
    PriceSeries::new("TESTUSDT", "1h", bars).unwrap()
}

fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar::new(i as i64 * HOUR_MS, open, open.max(close), open.min(close), close, 10.0)
        })
        .collect();
    PriceSeries::new("TESTUSDT", "1h", bars).unwrap()
}

fn moves_strategy() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    proptest::collection::vec((-5.0f64..5.0, 0.0f64..2.0, 0.0f64..1_000.0), 30..200)
}

proptest! {
    #[test]
    fn outputs_are_finite_and_rsi_bounded(moves in moves_strategy()) {
        let result = analyze(&series_from_moves(&moves), "TESTUSDT").unwrap();

        for value in [
            result.price, result.ema12, result.ema26, result.rsi,
            result.long_short, result.tp_long, result.sl_long, result.rr,
        ] {
            prop_assert!(value.is_finite());
        }
        prop_assert!((0.0..=100.0).contains(&result.rsi));
        prop_assert!(result.long_short >= 0.01 && result.long_short <= 100.0);
    }

    #[test]
    fn fib_levels_are_ordered_within_swing(moves in moves_strategy()) {
        let fib = analyze(&series_from_moves(&moves), "TESTUSDT").unwrap().fib;

        let prices: Vec<f64> = fib.iter().map(|level| level.price).collect();
        prop_assert_eq!(prices.len(), 4);
        prop_assert!(prices[0] <= fib.swing_high);
        prop_assert!(prices.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(prices[3] >= fib.swing_low);
    }

    #[test]
    fn risk_reward_recomputes_from_targets(moves in moves_strategy()) {
        let result = analyze(&series_from_moves(&moves), "TESTUSDT").unwrap();

        let risk = result.price - result.sl_long;
        if risk.abs() <= f64::EPSILON * result.price.abs().max(1.0) {
            prop_assert_eq!(result.rr, 0.0);
        } else {
            let expected = (result.tp_long - result.price) / risk * 100.0;
            prop_assert!((result.rr - expected).abs() <= 1e-6 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn repeated_analysis_is_identical(moves in moves_strategy()) {
        let series = series_from_moves(&moves);
        let engine = AnalysisEngine::new(EngineConfig {
            swing_window: Some(20),
            ..EngineConfig::default()
        });
        prop_assert_eq!(
            engine.analyze(&series, "TESTUSDT").unwrap(),
            engine.analyze(&series, "TESTUSDT").unwrap()
        );
    }
}

#[test]
fn linear_rise_puts_midpoint_at_105() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + 10.0 * i as f64 / 29.0).collect();
    let result = analyze(&series_from_closes(&closes), "TESTUSDT").unwrap();

    assert_eq!(result.fib.swing_high, 110.0);
    assert_eq!(result.fib.swing_low, 100.0);
    assert_eq!(result.fib.get("50%"), Some(105.0));
}

#[test]
fn flat_series_collapses_levels_and_risk() {
    let series = series_from_closes(&[42.0; 40]);
    let result = analyze(&series, "TESTUSDT").unwrap();

    assert!(result.fib.iter().all(|level| level.price == 42.0));
    assert_eq!(result.sl_long, 42.0);
    assert_eq!(result.tp_long, 42.0);
    assert_eq!(result.rr, 0.0);
    assert_eq!(result.long_short, 1.0);
}

#[test]
fn overbought_rally_is_a_sell() {
    // four steps up, one step down: uptrend with RSI near 80
    let mut closes = vec![100.0];
    for i in 1..60 {
        let step = if i % 5 == 0 { -1.0 } else { 1.0 };
        closes.push(closes[i - 1] + step);
    }
    let result = analyze(&series_from_closes(&closes), "TESTUSDT").unwrap();

    assert!(result.ema12 > result.ema26);
    assert!(result.rsi > 70.0, "rsi = {}", result.rsi);
    assert_eq!(result.recommend, Recommendation::Sell);
}

#[test]
fn minimum_length_boundary() {
    let closes: Vec<f64> = (0..MIN_SERIES_LEN).map(|i| 50.0 + (i % 7) as f64).collect();
    assert!(analyze(&series_from_closes(&closes), "TESTUSDT").is_ok());

    let short = &closes[..MIN_SERIES_LEN - 1];
    assert_eq!(
        analyze(&series_from_closes(short), "TESTUSDT").unwrap_err(),
        AnalysisError::InsufficientData {
            required: MIN_SERIES_LEN,
            actual: MIN_SERIES_LEN - 1,
        }
    );
}

#[test]
fn target_sits_above_close_when_stop_is_below() {
    let closes: Vec<f64> = (0..40).map(|i| 200.0 + (i as f64 * 0.4).sin() * 10.0).collect();
    let result = analyze(&series_from_closes(&closes), "TESTUSDT").unwrap();

    if result.sl_long < result.price {
        assert!(result.tp_long > result.price);
        assert_relative_eq!(result.rr, 200.0, epsilon = 1e-6);
    }
}
