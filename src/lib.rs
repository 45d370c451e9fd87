// src/lib.rs
// Main library module declarations

pub mod analysis;
pub mod config;
pub mod domain;
pub mod market_data;
pub mod presentation;
pub mod service;

pub use analysis::{analyze, AnalysisEngine, EngineConfig};
pub use domain::{AnalysisResult, AppError, AppResult, PriceBar, PriceSeries};
pub use service::AnalysisService;
