//! Core data types for the Pulse analytics engine.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One ticker's trading record for a single date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    /// Ticker symbol (uppercase)
    pub ticker: String,
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Daily high
    pub high: f64,
    /// Daily low
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
    /// Fractional change from the previous close. `None` for a ticker's
    /// first observation and where the previous close was zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_return: Option<f64>,
}

impl Observation {
    /// Create an observation with all prices set to `close` and no volume.
    pub fn new(ticker: &str, date: NaiveDate, close: f64) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
            daily_return: None,
        }
    }
}

/// Reference record mapping a ticker to its company and sector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerInfo {
    /// Ticker symbol (uppercase)
    pub ticker: String,
    /// Company name
    pub company: String,
    /// Sector classification
    pub sector: String,
}

impl TickerInfo {
    /// Create a reference record, uppercasing the ticker.
    pub fn new(ticker: &str, company: &str, sector: &str) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            company: company.to_string(),
            sector: sector.to_string(),
        }
    }
}

/// Calendar (year, month) bucket used for monthly resampling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Bucket key for a trading date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    /// Parse a `YYYY-MM` key.
    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| Error::InvalidMonth(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| Error::InvalidMonth(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| Error::InvalidMonth(s.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(s.to_string()));
        }
        Ok(Self { year, month })
    }
}

/// Per-ticker first-to-last close summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlySummary {
    /// Ticker symbol
    pub ticker: String,
    /// Close of the first observation
    pub start_close: f64,
    /// Close of the last observation
    pub end_close: f64,
    /// `(end_close - start_close) / start_close`. `None` when the start
    /// close is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_return: Option<f64>,
}

/// Per-ticker volatility: sample standard deviation of daily returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerVolatility {
    /// Ticker symbol
    pub ticker: String,
    /// Sample standard deviation of the non-null daily returns
    pub volatility: f64,
}

/// Market-wide roll-up of yearly summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketSummary {
    /// Tickers with a positive yearly return
    pub green: usize,
    /// Tickers with a zero or negative yearly return
    pub red: usize,
    /// Arithmetic mean of last closes (NaN propagates)
    pub avg_end_close: f64,
}

/// One ticker's return over one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyReturn {
    /// Ticker symbol
    pub ticker: String,
    /// Calendar bucket
    pub month: MonthKey,
    /// Close of the earliest observation in the bucket
    pub first_close: f64,
    /// Close of the latest observation in the bucket
    pub last_close: f64,
    /// `(last_close - first_close) / first_close`. `None` when the first
    /// close is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_return: Option<f64>,
}

/// Average final cumulative return across a sector's tickers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorPerformance {
    /// Sector name
    pub sector: String,
    /// Arithmetic mean of the member tickers' final cumulative returns
    pub avg_cumulative_return: f64,
    /// Number of tickers contributing to the mean
    pub ticker_count: usize,
}

/// One ticker's cumulative return series aligned to a shared date index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerSeries {
    /// Ticker symbol
    pub ticker: String,
    /// Cumulative return per date; `None` where the ticker had no
    /// observation
    pub values: Vec<Option<f64>>,
}

/// Date-indexed multi-series table of cumulative returns, ready for line
/// plotting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CumulativeTable {
    /// Shared ascending date index
    pub dates: Vec<NaiveDate>,
    /// One aligned series per ticker
    pub series: Vec<TickerSeries>,
}

/// Ticker-by-ticker Pearson correlation of daily returns.
///
/// Symmetric with a unit diagonal. Pairs without a defined correlation
/// (fewer than two overlapping dates, or a constant column) hold `0.0`;
/// that zero is a display substitution, not a measured value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationMatrix {
    /// Row/column order
    pub tickers: Vec<String>,
    /// N x N correlation entries in [-1, 1]
    pub values: Vec<Vec<f64>>,
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
