// src/domain/mod.rs
pub mod artifacts;
pub mod errors;
pub mod models;

// Re-export common types for convenience
pub use artifacts::ChartHandle;
pub use errors::{
    AnalysisError, AppError, AppResult, EngineResult, MarketDataError, MarketDataResult,
    PresentationError, PresentationResult,
};
pub use models::{
    AnalysisResult, Classification, FibLevel, FibLevels, Indicators, PriceBar, PriceSeries,
    Recommendation, Targets, Trend, FIB_RATIOS,
};
