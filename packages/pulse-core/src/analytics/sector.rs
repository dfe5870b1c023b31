//! Sector-level aggregation of cumulative returns.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::returns::final_cumulative_returns;
use crate::store::PriceSeries;
use crate::types::{SectorPerformance, TickerInfo};

/// Average final cumulative return per sector, sorted descending.
///
/// Each ticker's total cumulative return is left-joined against the
/// reference table; tickers with no reference row have no sector and are
/// dropped from the rollup (not errored). Exact ties between sector means
/// keep alphabetical sector order.
pub fn sector_performance(
    series: &PriceSeries,
    stocks: &[TickerInfo],
) -> Vec<SectorPerformance> {
    let sector_of: HashMap<&str, &str> = stocks
        .iter()
        .map(|s| (s.ticker.as_str(), s.sector.as_str()))
        .collect();

    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (ticker, cumulative) in final_cumulative_returns(series) {
        let Some(sector) = sector_of.get(ticker.as_str()) else {
            continue;
        };
        let entry = groups.entry(sector).or_insert((0.0, 0));
        entry.0 += cumulative;
        entry.1 += 1;
    }

    let mut rollup: Vec<SectorPerformance> = groups
        .into_iter()
        .map(|(sector, (sum, count))| SectorPerformance {
            sector: sector.to_string(),
            avg_cumulative_return: sum / count as f64,
            ticker_count: count,
        })
        .collect();
    rollup.sort_by(|a, b| {
        b.avg_cumulative_return
            .partial_cmp(&a.avg_cumulative_return)
            .unwrap_or(Ordering::Equal)
    });
    rollup
}
