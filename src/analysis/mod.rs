// src/analysis/mod.rs
pub mod engine;
pub mod fibonacci;
pub mod indicators;
pub mod pressure;
pub mod signals;
pub mod targets;

pub use engine::{analyze, AnalysisEngine, EngineConfig};
pub use fibonacci::compute_fib_levels;
pub use indicators::{compute_indicators, MIN_SERIES_LEN};
pub use pressure::long_short_ratio;
pub use signals::{classify, RsiThresholds};
pub use targets::compute_targets;
