// src/market_data/mod.rs
pub mod binance;
pub mod cache;
pub mod provider;

pub use binance::BinanceProvider;
pub use cache::CachedProvider;
pub use provider::{normalize_symbol, DataProvider};
