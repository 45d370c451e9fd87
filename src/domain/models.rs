// src/domain/models.rs
use crate::domain::errors::{AnalysisError, EngineResult};
use crate::domain::artifacts::ChartHandle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One OHLCV sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Open time in milliseconds since the Unix epoch
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(open_time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn open_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.open_time)
    }

    fn validate(&self, index: usize) -> EngineResult<()> {
        let values = [self.open, self.high, self.low, self.close, self.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "bar {} contains a non-finite value",
                index
            )));
        }
        if self.volume < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "bar {} has negative volume {}",
                index, self.volume
            )));
        }
        if self.high < self.open.max(self.close) {
            return Err(AnalysisError::InvalidInput(format!(
                "bar {} high {} is below its body",
                index, self.high
            )));
        }
        if self.low > self.open.min(self.close) {
            return Err(AnalysisError::InvalidInput(format!(
                "bar {} low {} is above its body",
                index, self.low
            )));
        }
        Ok(())
    }
}

/// Validated, time-ordered price history for one trading pair.
///
/// Construction checks every bar once, so code holding a `PriceSeries` can rely on
/// it being non-empty, strictly increasing in time and free of non-finite values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    interval: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: &str, interval: &str, bars: Vec<PriceBar>) -> EngineResult<Self> {
        if bars.is_empty() {
            return Err(AnalysisError::InvalidInput(format!(
                "price series for {} is empty",
                symbol
            )));
        }

        for (i, bar) in bars.iter().enumerate() {
            bar.validate(i)?;
            if i > 0 && bar.open_time <= bars[i - 1].open_time {
                return Err(AnalysisError::InvalidInput(format!(
                    "bar {} at {} is not after the previous bar at {}",
                    i,
                    bar.open_time,
                    bars[i - 1].open_time
                )));
            }
        }

        Ok(Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Last bar of the series; always present.
    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// The trailing `window` bars, or the whole series when `window` is `None`
    /// or larger than the series.
    pub fn window(&self, window: Option<usize>) -> &[PriceBar] {
        match window {
            Some(n) if n > 0 && n < self.bars.len() => &self.bars[self.bars.len() - n..],
            _ => &self.bars,
        }
    }

    pub fn close_prices(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Trend::Uptrend => write!(f, "uptrend"),
            Trend::Downtrend => write!(f, "downtrend"),
            Trend::Sideways => write!(f, "sideways"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "buy"),
            Recommendation::Sell => write!(f, "sell"),
            Recommendation::Hold => write!(f, "hold"),
        }
    }
}

/// Retracement ratios and their display labels, in ascending ratio order.
pub const FIB_RATIOS: [(&str, f64); 4] = [
    ("23.6%", 0.236),
    ("38.2%", 0.382),
    ("50%", 0.5),
    ("61.8%", 0.618),
];

#[derive(Debug, Clone, PartialEq)]
pub struct FibLevel {
    pub label: &'static str,
    pub ratio: f64,
    pub price: f64,
}

/// Fibonacci retracement levels measured down from the swing high.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibLevels {
    pub swing_high: f64,
    pub swing_low: f64,
    /// Serialized as a `label -> price` map in ratio order
    #[serde(serialize_with = "levels_by_label")]
    pub levels: Vec<FibLevel>,
}

fn levels_by_label<S: Serializer>(levels: &[FibLevel], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(levels.iter().map(|level| (level.label, level.price)))
}

impl FibLevels {
    /// Price of the level with the given label, e.g. `"50%"`.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.levels
            .iter()
            .find(|level| level.label == label)
            .map(|level| level.price)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FibLevel> {
        self.levels.iter()
    }
}

/// Final values of the indicators the classifier works on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Indicators {
    pub ema12: f64,
    pub ema26: f64,
    pub rsi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub trend: Trend,
    pub recommend: Recommendation,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Targets {
    pub tp_long: f64,
    pub sl_long: f64,
    pub rr: f64,
}

/// Outcome of one analysis call. Created fresh per call and owned by the caller.
#[derive(Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub price: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub rsi: f64,
    pub fib: FibLevels,
    pub long_short: f64,
    pub tp_long: f64,
    pub sl_long: f64,
    pub rr: f64,
    pub trend: Trend,
    pub recommend: Recommendation,
    pub reason: String,
    #[serde(skip)]
    pub chart: Option<ChartHandle>,
}
