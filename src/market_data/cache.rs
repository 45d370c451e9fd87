// src/market_data/cache.rs
use crate::domain::errors::MarketDataResult;
use crate::domain::models::PriceSeries;
use crate::market_data::provider::DataProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Default freshness window for cached series
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct CacheEntry {
    series: PriceSeries,
    fetched_at: DateTime<Utc>,
}

/// Whether data fetched at `fetched_at` is still usable at `now`.
pub fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(fetched_at) < ttl
}

/// Wraps a provider and serves series fetched within the TTL from memory.
///
/// Only successful fetches are stored; a failed fetch leaves any previous
/// entry untouched and is reported to the caller.
pub struct CachedProvider<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<P: DataProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl(inner: P) -> Self {
        Self::new(inner, Duration::seconds(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop every cached entry
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Remove entries that are no longer fresh, returning how many were dropped
    pub async fn evict_stale(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| is_fresh(entry.fetched_at, now, self.ttl));
        before - entries.len()
    }

    async fn cached(&self, symbol: &str, now: DateTime<Utc>) -> Option<PriceSeries> {
        self.entries
            .lock()
            .await
            .get(symbol)
            .filter(|entry| is_fresh(entry.fetched_at, now, self.ttl))
            .map(|entry| entry.series.clone())
    }
}

#[async_trait]
impl<P: DataProvider> DataProvider for CachedProvider<P> {
    async fn fetch_series(&self, symbol: &str) -> MarketDataResult<PriceSeries> {
        if let Some(series) = self.cached(symbol, Utc::now()).await {
            log::debug!("Cache hit for {}", symbol);
            return Ok(series);
        }

        log::info!("Cache miss for {}, fetching", symbol);
        let series = match self.inner.fetch_series(symbol).await {
            Ok(series) => series,
            Err(e) => {
                if self.entries.lock().await.contains_key(symbol) {
                    log::warn!("Refreshing stale data for {} failed: {}", symbol, e);
                }
                return Err(e);
            }
        };

        self.entries.lock().await.insert(
            symbol.to_string(),
            CacheEntry {
                series: series.clone(),
                fetched_at: Utc::now(),
            },
        );

        Ok(series)
    }
}
