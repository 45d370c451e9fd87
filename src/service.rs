// src/service.rs
use crate::analysis::engine::AnalysisEngine;
use crate::domain::errors::{AppResult, MarketDataError};
use crate::domain::models::AnalysisResult;
use crate::market_data::provider::{normalize_symbol, DataProvider};
use crate::presentation::chart::ChartRenderer;
use std::sync::Arc;

/// Fetches, analyzes and optionally charts one symbol per call.
///
/// Collaborators are shared behind `Arc`, so a single service can be used
/// from many tasks at once.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn DataProvider>,
    engine: AnalysisEngine,
    renderer: Option<Arc<dyn ChartRenderer>>,
    quote_asset: String,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn DataProvider>, engine: AnalysisEngine, quote_asset: &str) -> Self {
        Self {
            provider,
            engine,
            renderer: None,
            quote_asset: quote_asset.to_string(),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Analyze a user query such as `btc` or `ETHUSDT`
    pub async fn analyze_symbol(&self, query: &str) -> AppResult<AnalysisResult> {
        let symbol = normalize_symbol(query, &self.quote_asset)?;

        let series = self.provider.fetch_series(&symbol).await.map_err(|e| match e {
            MarketDataError::DataUnavailable(_) => e,
            other => MarketDataError::DataUnavailable(format!("{}: {}", symbol, other)),
        })?;

        log::info!("Analyzing {} over {} bars", symbol, series.len());
        let mut result = self.engine.analyze(&series, &symbol)?;

        if let Some(renderer) = &self.renderer {
            match renderer.render(&symbol, &series) {
                Ok(chart) => result.chart = Some(chart),
                Err(e) => log::warn!("Chart for {} could not be rendered: {}", symbol, e),
            }
        }

        Ok(result)
    }
}
