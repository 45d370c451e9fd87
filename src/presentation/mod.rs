// src/presentation/mod.rs
pub mod chart;
pub mod message;

pub use chart::{ChartRenderer, SvgChartRenderer};
pub use message::{format_analysis_message, AnalysisMessage};
