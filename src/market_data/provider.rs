// src/market_data/provider.rs
use crate::domain::errors::{MarketDataError, MarketDataResult};
use crate::domain::models::PriceSeries;
use async_trait::async_trait;

/// Source of OHLCV history for a trading pair
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch the price series for an exchange symbol such as `BTCUSDT`.
    ///
    /// Any failure to obtain the data surfaces as [`MarketDataError::DataUnavailable`].
    async fn fetch_series(&self, symbol: &str) -> MarketDataResult<PriceSeries>;
}

#[async_trait]
impl<P: DataProvider + ?Sized> DataProvider for std::sync::Arc<P> {
    async fn fetch_series(&self, symbol: &str) -> MarketDataResult<PriceSeries> {
        (**self).fetch_series(symbol).await
    }
}

/// Turn a user query such as `btc` into an exchange symbol (`BTCUSDT`).
pub fn normalize_symbol(query: &str, quote_asset: &str) -> MarketDataResult<String> {
    let base = query.trim().to_uppercase();
    let quote = quote_asset.trim().to_uppercase();

    if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MarketDataError::DataUnavailable(format!(
            "Invalid symbol query: '{}'",
            query
        )));
    }

    if base.ends_with(&quote) && base.len() > quote.len() {
        Ok(base)
    } else {
        Ok(format!("{}{}", base, quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_quote_asset() {
        assert_eq!(normalize_symbol(" btc ", "USDT").unwrap(), "BTCUSDT");
        assert_eq!(normalize_symbol("Eth", "usdt").unwrap(), "ETHUSDT");
    }

    #[test]
    fn keeps_full_symbols() {
        assert_eq!(normalize_symbol("solusdt", "USDT").unwrap(), "SOLUSDT");
    }

    #[test]
    fn bare_quote_asset_is_a_base() {
        assert_eq!(normalize_symbol("usdt", "USDT").unwrap(), "USDTUSDT");
    }

    #[test]
    fn rejects_empty_or_odd_queries() {
        assert!(normalize_symbol("  ", "USDT").is_err());
        assert!(normalize_symbol("btc/usdt", "USDT").is_err());
    }
}
