//! Calendar-month resampling and monthly movers.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::returns::change_ratio;
use crate::store::PriceSeries;
use crate::types::{MonthKey, MonthlyReturn};

/// Bucket every ticker's observations into calendar months.
///
/// Each non-empty (ticker, month) bucket yields one row with the bucket's
/// earliest and latest close; months with no observations produce no row at
/// all (no forward-filling). Output is ordered by ticker alphabetically,
/// then month chronologically.
pub fn monthly_returns(series: &PriceSeries) -> Vec<MonthlyReturn> {
    let mut rows = Vec::new();
    for (ticker, obs) in series.iter() {
        // Observations are date-sorted, so the first close seen in a bucket
        // is the earliest and the running update keeps the latest.
        let mut buckets: BTreeMap<MonthKey, (f64, f64)> = BTreeMap::new();
        for o in obs {
            buckets
                .entry(MonthKey::from_date(o.date))
                .and_modify(|closes| closes.1 = o.close)
                .or_insert((o.close, o.close));
        }
        for (month, (first_close, last_close)) in buckets {
            rows.push(MonthlyReturn {
                ticker: ticker.clone(),
                month,
                first_close,
                last_close,
                monthly_return: change_ratio(first_close, last_close),
            });
        }
    }
    rows
}

/// Rows for exactly the requested month.
///
/// An unknown month returns an empty vector, not an error; callers branch
/// on emptiness.
pub fn select_month(rows: &[MonthlyReturn], month: MonthKey) -> Vec<MonthlyReturn> {
    rows.iter().filter(|r| r.month == month).cloned().collect()
}

/// Distinct months present in the rows, newest first.
pub fn available_months(rows: &[MonthlyReturn]) -> Vec<MonthKey> {
    let months: BTreeSet<MonthKey> = rows.iter().map(|r| r.month).collect();
    months.into_iter().rev().collect()
}

/// Top `k` rows by monthly return, descending.
///
/// Rows without a defined monthly return are excluded; exact ties keep the
/// incoming order (alphabetical ticker within a month).
pub fn top_gainers(rows: &[MonthlyReturn], k: usize) -> Vec<MonthlyReturn> {
    let mut ranked: Vec<MonthlyReturn> = rows
        .iter()
        .filter(|r| r.monthly_return.is_some())
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.monthly_return
            .partial_cmp(&a.monthly_return)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}

/// Bottom `k` rows by monthly return, ascending.
pub fn top_losers(rows: &[MonthlyReturn], k: usize) -> Vec<MonthlyReturn> {
    let mut ranked: Vec<MonthlyReturn> = rows
        .iter()
        .filter(|r| r.monthly_return.is_some())
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        a.monthly_return
            .partial_cmp(&b.monthly_return)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Observation;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn obs(ticker: &str, date: NaiveDate, close: f64) -> Observation {
        Observation::new(ticker, date, close)
    }

    fn month(year: i32, month: u32) -> MonthKey {
        MonthKey { year, month }
    }

    #[test]
    fn test_monthly_buckets_span_months() {
        // Daily closes from Jan 1 to Feb 5; only five February days exist.
        let mut observations = Vec::new();
        for day in 1..=31 {
            observations.push(obs("AAPL", d(2024, 1, day), 100.0 + day as f64));
        }
        for day in 1..=5 {
            observations.push(obs("AAPL", d(2024, 2, day), 200.0 + day as f64));
        }
        let series = PriceSeries::from_observations(observations);
        let rows = monthly_returns(&series);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month, month(2024, 1));
        assert_eq!(rows[0].first_close, 101.0);
        assert_eq!(rows[0].last_close, 131.0);
        assert_eq!(rows[1].month, month(2024, 2));
        assert_eq!(rows[1].first_close, 201.0);
        assert_eq!(rows[1].last_close, 205.0);
    }

    #[test]
    fn test_monthly_return_value() {
        let series = PriceSeries::from_observations(vec![
            obs("AAPL", d(2024, 1, 2), 100.0),
            obs("AAPL", d(2024, 1, 31), 110.0),
        ]);
        let rows = monthly_returns(&series);
        assert_relative_eq!(rows[0].monthly_return.unwrap(), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_months_are_absent() {
        // January and March trade, February does not: exactly two rows.
        let series = PriceSeries::from_observations(vec![
            obs("AAPL", d(2024, 1, 15), 100.0),
            obs("AAPL", d(2024, 3, 15), 120.0),
        ]);
        let rows = monthly_returns(&series);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.month != month(2024, 2)));
    }

    #[test]
    fn test_monthly_return_undefined_on_zero_first_close() {
        let series = PriceSeries::from_observations(vec![
            obs("ZERO", d(2024, 1, 2), 0.0),
            obs("ZERO", d(2024, 1, 3), 60.0),
        ]);
        let rows = monthly_returns(&series);
        assert_eq!(rows[0].monthly_return, None);
    }

    #[test]
    fn test_select_month_filters() {
        let series = PriceSeries::from_observations(vec![
            obs("AAPL", d(2024, 1, 2), 100.0),
            obs("AAPL", d(2024, 2, 2), 105.0),
            obs("MSFT", d(2024, 1, 2), 50.0),
        ]);
        let rows = monthly_returns(&series);

        let january = select_month(&rows, month(2024, 1));
        assert_eq!(january.len(), 2);
        assert!(january.iter().all(|r| r.month == month(2024, 1)));
    }

    #[test]
    fn test_select_month_absent_is_empty() {
        let series = PriceSeries::from_observations(vec![obs("AAPL", d(2024, 1, 2), 100.0)]);
        let rows = monthly_returns(&series);
        assert!(select_month(&rows, month(2030, 6)).is_empty());
    }

    #[test]
    fn test_available_months_newest_first() {
        let series = PriceSeries::from_observations(vec![
            obs("AAPL", d(2023, 12, 29), 100.0),
            obs("AAPL", d(2024, 1, 2), 101.0),
            obs("MSFT", d(2024, 2, 2), 50.0),
        ]);
        let rows = monthly_returns(&series);
        let months = available_months(&rows);

        assert_eq!(
            months,
            vec![month(2024, 2), month(2024, 1), month(2023, 12)]
        );
    }

    #[test]
    fn test_gainers_and_losers() {
        let series = PriceSeries::from_observations(vec![
            obs("AAA", d(2024, 1, 2), 100.0),
            obs("AAA", d(2024, 1, 31), 120.0),
            obs("BBB", d(2024, 1, 2), 100.0),
            obs("BBB", d(2024, 1, 31), 90.0),
            obs("CCC", d(2024, 1, 2), 100.0),
            obs("CCC", d(2024, 1, 31), 105.0),
        ]);
        let rows = monthly_returns(&series);

        let gainers = top_gainers(&rows, 2);
        assert_eq!(gainers[0].ticker, "AAA");
        assert_eq!(gainers[1].ticker, "CCC");

        let losers = top_losers(&rows, 1);
        assert_eq!(losers[0].ticker, "BBB");
    }
}
