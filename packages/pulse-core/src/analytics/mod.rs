//! Analytics over a price series snapshot.
//!
//! Every function here is a pure transformation of an immutable
//! [`PriceSeries`](crate::store::PriceSeries): per-ticker summaries and
//! rankings, calendar-month resampling, cross-ticker correlation, and
//! sector rollups.

mod correlation;
mod monthly;
mod sector;
mod summary;

pub use correlation::{build_return_matrix, correlation_matrix, pearson, ReturnMatrix};
pub use monthly::{available_months, monthly_returns, select_month, top_gainers, top_losers};
pub use sector::sector_performance;
pub use summary::{
    bottom_n, market_summary, top_n, top_volatility, volatilities, yearly_summaries,
};
