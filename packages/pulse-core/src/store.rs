//! The price series store: an immutable, ticker-partitioned, date-ordered
//! table of daily observations.
//!
//! Construction is lenient. Rows missing a ticker, date, or close are
//! logged and skipped rather than aborting the load; duplicate
//! (ticker, date) rows keep their first occurrence. Tickers are uppercased
//! and each ticker's observations are sorted ascending by date, so every
//! consumer can rely on chronological order within a group and alphabetical
//! order across groups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Observation;

/// One row of the raw `prices` table, before validation.
///
/// Every field is optional so that a partially populated source row can be
/// inspected and rejected instead of failing deserialization outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPriceRow {
    pub ticker: Option<String>,
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub daily_return: Option<f64>,
}

/// Immutable snapshot of daily observations, grouped by ticker.
///
/// Groups iterate in alphabetical ticker order and each group is sorted
/// ascending by date. This ordering is what makes downstream ranking
/// tie-breaks deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    groups: BTreeMap<String, Vec<Observation>>,
}

impl PriceSeries {
    /// Build a series from raw table rows, skipping malformed ones.
    ///
    /// A row is malformed when it lacks a ticker, a date, or a close; such
    /// rows are logged at `warn` and dropped. Missing open/high/low fall
    /// back to the close, missing volume to zero.
    pub fn from_rows(rows: Vec<RawPriceRow>) -> Self {
        let total = rows.len();
        let observations: Vec<Observation> = rows
            .into_iter()
            .filter_map(|row| {
                let ticker = match row.ticker {
                    Some(ref t) if !t.trim().is_empty() => t.trim().to_uppercase(),
                    _ => {
                        tracing::warn!(date = ?row.date, "skipping price row without ticker");
                        return None;
                    }
                };
                let date = match row.date {
                    Some(d) => d,
                    None => {
                        tracing::warn!(ticker = %ticker, "skipping price row without date");
                        return None;
                    }
                };
                let close = match row.close {
                    Some(c) => c,
                    None => {
                        tracing::warn!(ticker = %ticker, date = %date, "skipping price row without close");
                        return None;
                    }
                };
                Some(Observation {
                    ticker,
                    date,
                    open: row.open.unwrap_or(close),
                    high: row.high.unwrap_or(close),
                    low: row.low.unwrap_or(close),
                    close,
                    volume: row.volume.unwrap_or(0.0),
                    daily_return: row.daily_return,
                })
            })
            .collect();

        if observations.len() < total {
            tracing::debug!(
                kept = observations.len(),
                skipped = total - observations.len(),
                "price rows filtered during load"
            );
        }

        Self::from_observations(observations)
    }

    /// Build a series from already-shaped observations.
    ///
    /// Normalizes tickers to uppercase, sorts each group by date, drops
    /// duplicate (ticker, date) observations keeping the first, and fills
    /// in any missing daily returns from consecutive closes.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut groups: BTreeMap<String, Vec<Observation>> = BTreeMap::new();
        for mut obs in observations {
            obs.ticker = obs.ticker.to_uppercase();
            groups.entry(obs.ticker.clone()).or_default().push(obs);
        }

        for (ticker, group) in groups.iter_mut() {
            // Stable sort keeps source order between equal dates, so the
            // duplicate pass below retains the first-loaded row.
            group.sort_by_key(|o| o.date);

            let before = group.len();
            group.dedup_by(|b, a| a.date == b.date);
            if group.len() < before {
                tracing::warn!(
                    ticker = %ticker,
                    dropped = before - group.len(),
                    "dropped duplicate-date observations"
                );
            }

            fill_daily_returns(group);
        }

        Self { groups }
    }

    /// Tickers in alphabetical order.
    pub fn tickers(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    /// A ticker's observations, sorted ascending by date.
    pub fn get(&self, ticker: &str) -> Option<&[Observation]> {
        self.groups.get(ticker).map(|g| g.as_slice())
    }

    /// Iterate over (ticker, observations) in alphabetical ticker order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &[Observation])> {
        self.groups.iter().map(|(t, g)| (t, g.as_slice()))
    }

    /// Number of tickers.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the series holds no tickers at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total observation count across all tickers.
    pub fn observation_count(&self) -> usize {
        self.groups.values().map(|g| g.len()).sum()
    }
}

/// Fill missing daily returns from consecutive closes.
///
/// The first observation always carries `None`; later gaps are derived as
/// `(close - prev) / prev`, staying `None` where the previous close is zero
/// (the division is undefined, never infinity).
fn fill_daily_returns(group: &mut [Observation]) {
    for i in 0..group.len() {
        if i == 0 {
            group[0].daily_return = None;
            continue;
        }
        if group[i].daily_return.is_some() {
            continue;
        }
        let prev = group[i - 1].close;
        group[i].daily_return = if prev == 0.0 {
            None
        } else {
            Some((group[i].close - prev) / prev)
        };
    }
}
