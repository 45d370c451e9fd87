// src/main.rs
use coin_analyst::config::{Config, OutputFormat};
use coin_analyst::domain::errors::AppResult;
use coin_analyst::market_data::{BinanceProvider, CachedProvider, DataProvider};
use coin_analyst::presentation::{format_analysis_message, ChartRenderer, SvgChartRenderer};
use coin_analyst::{AnalysisEngine, AnalysisService};

use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::from_env()?,
    };

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting coin_analyst v{}", env!("CARGO_PKG_VERSION"));

    let mut queries: Vec<String> = env::args().skip(1).collect();
    if queries.is_empty() {
        queries = config.symbols.clone();
    }
    if queries.is_empty() {
        eprintln!("Usage: coin_analyst [SYMBOL...]");
        std::process::exit(2);
    }

    let service = create_service(&config)?;

    let mut failures = 0;
    for query in &queries {
        match service.analyze_symbol(query).await {
            Ok(mut result) => {
                let chart_path = result.chart.take().map(|chart| chart.keep());

                match config.output_format {
                    OutputFormat::Text => println!("{}", format_analysis_message(&result, query)),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                }

                if let Some(path) = chart_path {
                    println!("📊 Chart saved to {}", path.display());
                }
            }
            Err(e) => {
                log::error!("Analysis of {} failed: {}", query, e);
                eprintln!("❌ {}", e.user_message(query));
                failures += 1;
            }
        }
    }

    if failures == queries.len() {
        log::error!("All {} symbol(s) failed", failures);
        std::process::exit(1);
    }

    Ok(())
}

/// Wire the Binance provider, cache, engine and chart renderer together
fn create_service(config: &Config) -> AppResult<AnalysisService> {
    let market = &config.market;
    let binance = match &market.base_url {
        Some(url) => BinanceProvider::with_url(url, &market.interval, market.kline_limit)?,
        None => BinanceProvider::new(&market.interval, market.kline_limit)?,
    };

    let interval = binance.interval().to_string();
    let cached = CachedProvider::new(binance, chrono::Duration::seconds(market.cache_ttl_secs));
    log::info!(
        "Using {} klines, cached for {}s",
        interval,
        cached.ttl().num_seconds()
    );
    let provider: Arc<dyn DataProvider> = Arc::new(cached);

    let service = AnalysisService::new(
        provider,
        AnalysisEngine::new(config.analysis.clone()),
        &market.quote_asset,
    );

    if config.chart.enabled {
        let renderer: Arc<dyn ChartRenderer> = Arc::new(SvgChartRenderer::new(
            config.chart.width,
            config.chart.height,
            config.chart.output_dir.clone(),
        ));
        Ok(service.with_renderer(renderer))
    } else {
        Ok(service)
    }
}
