//! Pulse Core - descriptive market analytics over daily price history.
//!
//! This crate is the analytics engine behind the Pulse dashboard. It turns a
//! per-ticker daily price table into the derived series and rankings the UI
//! displays:
//!
//! - **Returns**: daily and cumulative return chains per ticker
//! - **Summaries**: yearly return, volatility, top/bottom rankings
//! - **Resampling**: calendar-month buckets and monthly movers
//! - **Correlation**: pairwise Pearson correlation of daily returns
//! - **Sectors**: average cumulative return per sector
//!
//! Every computation is a pure function over an immutable [`PriceSeries`]
//! snapshot; nothing here performs I/O except [`Dataset`] loading, which is
//! the explicit ingestion boundary.
//!
//! # Example
//!
//! ```rust
//! use pulse_core::returns::{cumulative_returns, daily_returns};
//!
//! let closes = vec![100.0, 110.0, 121.0];
//! let daily = daily_returns(&closes);
//! let cumulative = cumulative_returns(&daily);
//!
//! assert_eq!(daily[0], None);
//! assert!((cumulative[2] - 0.21).abs() < 1e-12);
//! ```

pub mod analytics;
pub mod dataset;
pub mod returns;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, CorrelationMatrix, CumulativeTable, MarketSummary, MonthKey, MonthlyReturn,
    Observation, SectorPerformance, TickerInfo, TickerSeries, TickerVolatility, YearlySummary,
};

// Re-export main functionality
pub use analytics::{
    available_months, bottom_n, build_return_matrix, correlation_matrix, market_summary,
    monthly_returns, pearson, sector_performance, select_month, top_gainers, top_losers, top_n,
    top_volatility, volatilities, yearly_summaries, ReturnMatrix,
};
pub use dataset::Dataset;
pub use returns::{
    cumulative_returns, cumulative_table, daily_returns, final_cumulative_returns, top_cumulative,
};
pub use store::{PriceSeries, RawPriceRow};

/// Error types for pulse-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Invalid month key (expected YYYY-MM): {0}")]
    InvalidMonth(String),
}

/// Result type for pulse-core operations.
pub type Result<T> = std::result::Result<T, Error>;
