// src/market_data/binance.rs
use crate::domain::errors::{MarketDataError, MarketDataResult};
use crate::domain::models::{PriceBar, PriceSeries};
use crate::market_data::provider::DataProvider;
use async_trait::async_trait;
use binance_spot_connector_rust::{
    hyper::BinanceHttpClient,
    market::{self, klines::KlineInterval},
};
use hyper::client::HttpConnector;
use hyper_tls::HttpsConnector;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Binance caps a single klines request at 1000 bars
pub const MAX_KLINE_LIMIT: u32 = 1000;

type HttpsClient = BinanceHttpClient<HttpsConnector<HttpConnector>>;

/// Data provider backed by the Binance spot klines endpoint
pub struct BinanceProvider {
    http_client: HttpsClient,
    interval: String,
    limit: u32,
}

impl BinanceProvider {
    /// Create a provider against the public Binance API
    pub fn new(interval: &str, limit: u32) -> MarketDataResult<Self> {
        Self::build(BinanceHttpClient::default(), interval, limit)
    }

    /// Create a provider against a custom base URL (e.g. the testnet)
    pub fn with_url(base_url: &str, interval: &str, limit: u32) -> MarketDataResult<Self> {
        Self::build(BinanceHttpClient::with_url(base_url), interval, limit)
    }

    fn build(http_client: HttpsClient, interval: &str, limit: u32) -> MarketDataResult<Self> {
        parse_interval(interval)?;
        Ok(Self {
            http_client,
            interval: interval.to_string(),
            limit: limit.clamp(1, MAX_KLINE_LIMIT),
        })
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }
}

#[async_trait]
impl DataProvider for BinanceProvider {
    async fn fetch_series(&self, symbol: &str) -> MarketDataResult<PriceSeries> {
        log::info!(
            "Fetching {} {} klines for {}",
            self.limit,
            self.interval,
            symbol
        );

        let request = market::klines(symbol, parse_interval(&self.interval)?).limit(self.limit);

        let response = self.http_client.send(request).await.map_err(|e| {
            MarketDataError::DataUnavailable(format!("Klines request for {} failed: {:?}", symbol, e))
        })?;

        let body = response.into_body_str().await.map_err(|e| {
            MarketDataError::DataUnavailable(format!(
                "Klines response for {} was rejected: {:?}",
                symbol, e
            ))
        })?;

        let bars = parse_klines(&body)?;
        PriceSeries::new(symbol, &self.interval, bars)
            .map_err(|e| MarketDataError::Parse(format!("Malformed klines for {}: {}", symbol, e)))
    }
}

/// Map an interval string onto the connector's interval enum
pub fn parse_interval(interval: &str) -> MarketDataResult<KlineInterval> {
    let kline_interval = match interval {
        "1m" => KlineInterval::Minutes1,
        "3m" => KlineInterval::Minutes3,
        "5m" => KlineInterval::Minutes5,
        "15m" => KlineInterval::Minutes15,
        "30m" => KlineInterval::Minutes30,
        "1h" => KlineInterval::Hours1,
        "2h" => KlineInterval::Hours2,
        "4h" => KlineInterval::Hours4,
        "6h" => KlineInterval::Hours6,
        "8h" => KlineInterval::Hours8,
        "12h" => KlineInterval::Hours12,
        "1d" => KlineInterval::Days1,
        "3d" => KlineInterval::Days3,
        "1w" => KlineInterval::Weeks1,
        "1M" => KlineInterval::Months1,
        _ => return Err(MarketDataError::InvalidInterval(interval.to_string())),
    };
    Ok(kline_interval)
}

/// Parse a klines response body (an array of kline arrays) into price bars
pub fn parse_klines(body: &str) -> MarketDataResult<Vec<PriceBar>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| MarketDataError::Parse(format!("Invalid klines JSON: {}", e)))?;

    let rows = value
        .as_array()
        .ok_or_else(|| MarketDataError::Parse("Klines response is not an array".to_string()))?;

    rows.iter().map(convert_kline_to_bar).collect()
}

fn convert_kline_to_bar(kline: &Value) -> MarketDataResult<PriceBar> {
    let arr = match kline {
        Value::Array(arr) if arr.len() >= 6 => arr,
        _ => return Err(MarketDataError::Parse("Invalid kline format".to_string())),
    };

    let open_time = arr[0]
        .as_i64()
        .ok_or_else(|| MarketDataError::Parse("Invalid open time in kline".to_string()))?;

    let parse_decimal = |value: &Value, field: &str| -> MarketDataResult<f64> {
        let text = value
            .as_str()
            .ok_or_else(|| MarketDataError::Parse(format!("Invalid {} in kline", field)))?;
        Decimal::from_str(text)
            .map_err(|e| MarketDataError::Parse(format!("Failed to parse {}: {}", field, e)))?
            .to_f64()
            .ok_or_else(|| MarketDataError::Parse(format!("{} out of range: {}", field, text)))
    };

    Ok(PriceBar {
        open_time,
        open: parse_decimal(&arr[1], "open price")?,
        high: parse_decimal(&arr[2], "high price")?,
        low: parse_decimal(&arr[3], "low price")?,
        close: parse_decimal(&arr[4], "close price")?,
        volume: parse_decimal(&arr[5], "volume")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"[
        [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100", "148976.11427815",
         1499644799999, "2434.19055334", 308, "1756.87402397", "28.46694368", "0"],
        [1499043600000, "0.01577100", "0.01600000", "0.01500000", "0.01590000", "1000.5",
         1499047199999, "15.9", 12, "500.25", "7.9", "0"]
    ]"#;

    #[test]
    fn parses_kline_rows() {
        let bars = parse_klines(SAMPLE).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open_time, 1499040000000);
        assert_eq!(bars[0].open, dec!(0.01634790).to_f64().unwrap());
        assert_eq!(bars[0].high, 0.8);
        assert_eq!(bars[1].close, 0.0159);
        assert_eq!(bars[1].volume, 1000.5);

        let series = PriceSeries::new("BNBBTC", "1h", bars).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn rejects_non_array_body() {
        let err = parse_klines(r#"{"code":-1121,"msg":"Invalid symbol."}"#).unwrap_err();
        assert!(matches!(err, MarketDataError::Parse(_)));
    }

    #[test]
    fn rejects_malformed_rows() {
        assert!(parse_klines(r#"[[1, "1.0", "2.0"]]"#).is_err());
        assert!(parse_klines(r#"[[1, "x", "2.0", "0.5", "1.5", "10"]]"#).is_err());
        assert!(parse_klines(r#"[["t", "1", "2", "0.5", "1.5", "10"]]"#).is_err());
    }

    #[test]
    fn maps_supported_intervals() {
        for interval in ["1m", "5m", "1h", "4h", "1d", "1w", "1M"] {
            assert!(parse_interval(interval).is_ok(), "{}", interval);
        }
        assert!(matches!(
            parse_interval("7h"),
            Err(MarketDataError::InvalidInterval(ref i)) if i == "7h"
        ));
    }
}
