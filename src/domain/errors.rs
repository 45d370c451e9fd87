// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Presentation error: {0}")]
    Presentation(#[from] PresentationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Short message suitable for showing to an end user instead of the raw error.
    pub fn user_message(&self, symbol: &str) -> String {
        match self {
            AppError::MarketData(MarketDataError::DataUnavailable(_))
            | AppError::MarketData(MarketDataError::Parse(_)) => {
                format!("Symbol not found: {}. Try BTC, ETH...", symbol)
            }
            AppError::MarketData(MarketDataError::InvalidInterval(interval)) => {
                format!("Unsupported chart interval: {}", interval)
            }
            AppError::Analysis(AnalysisError::InsufficientData { required, actual }) => format!(
                "Not enough history for {}: need {} bars, got {}",
                symbol, required, actual
            ),
            AppError::Analysis(_) => format!("Price data for {} could not be analyzed", symbol),
            _ => format!("Analysis of {} failed, please try again later", symbol),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    #[error("No data available for: {0}")]
    DataUnavailable(String),

    #[error("Data parse error: {0}")]
    Parse(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data for analysis: need at least {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Non-finite result: {0}")]
    NonFinite(String),
}

#[derive(Error, Debug)]
pub enum PresentationError {
    #[error("Chart IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chart render error: {0}")]
    Render(String),
}

// Result type aliases for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type MarketDataResult<T> = Result<T, MarketDataError>;
pub type EngineResult<T> = Result<T, AnalysisError>;
pub type PresentationResult<T> = Result<T, PresentationError>;
