//! Per-ticker scalar summaries and cross-ticker rankings.

use std::cmp::Ordering;

use crate::returns::change_ratio;
use crate::store::PriceSeries;
use crate::types::{MarketSummary, TickerVolatility, YearlySummary};

/// Yearly return assigned to a ticker with exactly one observation.
///
/// Start and end close coincide, so the dashboard reports it as flat. Kept
/// as its own function so the policy can switch to `None` without touching
/// call sites.
fn single_observation_return() -> Option<f64> {
    Some(0.0)
}

/// First-to-last close summary for every ticker.
///
/// Output is in alphabetical ticker order. `yearly_return` is `None` when
/// the start close is zero.
pub fn yearly_summaries(series: &PriceSeries) -> Vec<YearlySummary> {
    series
        .iter()
        .filter_map(|(ticker, obs)| {
            let first = obs.first()?;
            let last = obs.last()?;
            let yearly_return = if obs.len() == 1 {
                single_observation_return()
            } else {
                change_ratio(first.close, last.close)
            };
            Some(YearlySummary {
                ticker: ticker.clone(),
                start_close: first.close,
                end_close: last.close,
                yearly_return,
            })
        })
        .collect()
}

/// Top `n` summaries by yearly return, descending.
///
/// Summaries without a defined yearly return are excluded. The sort is
/// stable, so exact ties keep the incoming alphabetical ticker order.
pub fn top_n(summaries: &[YearlySummary], n: usize) -> Vec<YearlySummary> {
    let mut ranked: Vec<YearlySummary> = summaries
        .iter()
        .filter(|s| s.yearly_return.is_some())
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.yearly_return
            .partial_cmp(&a.yearly_return)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// Bottom `n` summaries by yearly return, ascending.
pub fn bottom_n(summaries: &[YearlySummary], n: usize) -> Vec<YearlySummary> {
    let mut ranked: Vec<YearlySummary> = summaries
        .iter()
        .filter(|s| s.yearly_return.is_some())
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        a.yearly_return
            .partial_cmp(&b.yearly_return)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// Sample standard deviation (n-1 denominator).
///
/// `None` with fewer than two samples: a flat series yields `Some(0.0)`,
/// an insufficient one yields nothing, and the two must stay
/// distinguishable.
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Volatility per ticker: sample standard deviation of its non-null daily
/// returns.
///
/// Tickers with fewer than two non-null returns are excluded entirely,
/// never coerced to zero. Output is in alphabetical ticker order.
pub fn volatilities(series: &PriceSeries) -> Vec<TickerVolatility> {
    series
        .iter()
        .filter_map(|(ticker, obs)| {
            let returns: Vec<f64> = obs.iter().filter_map(|o| o.daily_return).collect();
            sample_std_dev(&returns).map(|volatility| TickerVolatility {
                ticker: ticker.clone(),
                volatility,
            })
        })
        .collect()
}

/// Top `n` tickers by descending volatility (the dashboard shows 20).
pub fn top_volatility(series: &PriceSeries, n: usize) -> Vec<TickerVolatility> {
    let mut ranked = volatilities(series);
    ranked.sort_by(|a, b| {
        b.volatility
            .partial_cmp(&a.volatility)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// Market-wide green/red counts and average last close.
///
/// Green counts `yearly_return > 0`, red counts `yearly_return <= 0`
/// (exactly zero is red). An undefined yearly return lands in neither
/// bucket. The mean of end closes is a plain arithmetic mean, so a NaN
/// close propagates into it.
pub fn market_summary(summaries: &[YearlySummary]) -> MarketSummary {
    let green = summaries
        .iter()
        .filter(|s| s.yearly_return.map(|r| r > 0.0).unwrap_or(false))
        .count();
    let red = summaries
        .iter()
        .filter(|s| s.yearly_return.map(|r| r <= 0.0).unwrap_or(false))
        .count();
    let avg_end_close = if summaries.is_empty() {
        f64::NAN
    } else {
        summaries.iter().map(|s| s.end_close).sum::<f64>() / summaries.len() as f64
    };

    MarketSummary {
        green,
        red,
        avg_end_close,
    }
}
