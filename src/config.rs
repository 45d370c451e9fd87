// src/config.rs
use crate::analysis::engine::EngineConfig;
use crate::analysis::indicators::MIN_SERIES_LEN;
use crate::analysis::signals::RsiThresholds;
use crate::analysis::targets::DEFAULT_RISK_REWARD_MULTIPLE;
use crate::domain::errors::{AppError, AppResult};
use crate::market_data::binance::MAX_KLINE_LIMIT;
use crate::market_data::cache::DEFAULT_CACHE_TTL_SECS;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Market data source configuration
    pub market: MarketConfig,

    /// Analysis engine tuning
    pub analysis: EngineConfig,

    /// Chart rendering configuration
    pub chart: ChartConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Symbols analyzed when none are given on the command line
    pub symbols: Vec<String>,

    /// How results are printed
    pub output_format: OutputFormat,
}

/// Market data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Kline interval (e.g., "1m", "1h", "1d")
    pub interval: String,

    /// Number of bars requested per fetch
    pub kline_limit: u32,

    /// Seconds a fetched series stays fresh
    pub cache_ttl_secs: i64,

    /// Quote asset appended to bare queries (e.g., "USDT")
    pub quote_asset: String,

    /// Alternative API base URL
    pub base_url: Option<String>,
}

/// Chart configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,

    /// Directory for chart files; the system temp dir when unset
    pub output_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log file path; logs go to stderr when unset
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Config(format!("Unknown output format: {}", other))),
        }
    }
}

/// Parse `key` from the environment, using `default` only when it is unset
fn env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid {}: {}", key, value))),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        let market = MarketConfig {
            interval: env::var("MARKET_INTERVAL").unwrap_or(defaults.market.interval),
            kline_limit: env_or("KLINE_LIMIT", defaults.market.kline_limit)?,
            cache_ttl_secs: env_or("CACHE_TTL_SECS", defaults.market.cache_ttl_secs)?,
            quote_asset: env::var("QUOTE_ASSET").unwrap_or(defaults.market.quote_asset),
            base_url: env::var("BINANCE_BASE_URL").ok(),
        };

        let analysis = EngineConfig {
            rsi: RsiThresholds {
                overbought: env_or("RSI_OVERBOUGHT", defaults.analysis.rsi.overbought)?,
                oversold: env_or("RSI_OVERSOLD", defaults.analysis.rsi.oversold)?,
            },
            risk_reward_multiple: env_or(
                "RISK_REWARD_MULTIPLE",
                defaults.analysis.risk_reward_multiple,
            )?,
            swing_window: match env::var("SWING_WINDOW") {
                Ok(value) => Some(value.trim().parse().map_err(|_| {
                    AppError::Config(format!("Invalid SWING_WINDOW: {}", value))
                })?),
                Err(_) => None,
            },
        };

        let chart = ChartConfig {
            enabled: env_or("CHART_ENABLED", defaults.chart.enabled)?,
            width: env_or("CHART_WIDTH", defaults.chart.width)?,
            height: env_or("CHART_HEIGHT", defaults.chart.height)?,
            output_dir: env::var("CHART_DIR").ok().map(PathBuf::from),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or(defaults.logging.level),
            file_path: env::var("LOG_FILE_PATH").ok(),
        };

        let symbols = match env::var("ANALYSIS_SYMBOLS") {
            Ok(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => defaults.symbols,
        };

        let output_format = match env::var("OUTPUT_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.output_format,
        };

        let config = Config {
            market,
            analysis,
            chart,
            logging,
            symbols,
            output_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path)
            .map_err(|e| AppError::Config(format!("Failed to open config file: {}", e)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        self.analysis.validate()?;

        let min_limit = MIN_SERIES_LEN as u32;
        if self.market.kline_limit < min_limit || self.market.kline_limit > MAX_KLINE_LIMIT {
            return Err(AppError::Config(format!(
                "Kline limit must be between {} and {}, got {}",
                min_limit, MAX_KLINE_LIMIT, self.market.kline_limit
            )));
        }
        if self.market.cache_ttl_secs < 0 {
            return Err(AppError::Config(format!(
                "Cache TTL cannot be negative, got {}",
                self.market.cache_ttl_secs
            )));
        }
        if self.market.quote_asset.trim().is_empty() {
            return Err(AppError::Config("Quote asset cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        if let Some(file_path) = &self.logging.file_path {
            let file = File::create(file_path)
                .map_err(|e| AppError::Config(format!("Failed to create log file: {}", e)))?;

            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        builder
            .try_init()
            .map_err(|e| AppError::Config(format!("Failed to initialize logger: {}", e)))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market: MarketConfig {
                interval: "1h".to_string(),
                kline_limit: 100,
                cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
                quote_asset: "USDT".to_string(),
                base_url: None,
            },
            analysis: EngineConfig {
                rsi: RsiThresholds::default(),
                risk_reward_multiple: DEFAULT_RISK_REWARD_MULTIPLE,
                swing_window: None,
            },
            chart: ChartConfig {
                enabled: true,
                width: 1000,
                height: 600,
                output_dir: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
            symbols: vec!["BTC".to_string()],
            output_format: OutputFormat::Text,
        }
    }
}
