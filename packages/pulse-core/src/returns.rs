//! Daily and cumulative return calculation.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::store::PriceSeries;
use crate::types::{CumulativeTable, TickerSeries};

/// Fractional change between two closes, `None` when the start is zero.
///
/// The zero-start case is an undefined division and propagates as `None`
/// through the whole pipeline; it must never surface as infinity or as a
/// silent zero.
pub(crate) fn change_ratio(start: f64, end: f64) -> Option<f64> {
    if start == 0.0 {
        None
    } else {
        Some((end - start) / start)
    }
}

/// Calculate daily returns from a date-sorted close series.
///
/// Entry 0 is always `None`; entry i is `(close_i - close_{i-1}) /
/// close_{i-1}`, or `None` where the previous close is zero.
///
/// # Example
///
/// ```rust
/// use pulse_core::returns::daily_returns;
///
/// let daily = daily_returns(&[100.0, 110.0, 121.0]);
/// assert_eq!(daily[0], None);
/// assert!((daily[1].unwrap() - 0.10).abs() < 1e-12);
/// ```
pub fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(closes.len());
    for (i, &close) in closes.iter().enumerate() {
        if i == 0 {
            result.push(None);
        } else {
            result.push(change_ratio(closes[i - 1], close));
        }
    }
    result
}

/// Calculate the cumulative return chain from daily returns.
///
/// Runs a single compounding accumulator over the series: entry i is
/// `(1+r_1)*...*(1+r_i) - 1`, with `None` returns contributing `r = 0`.
/// The last entry is the total-period return. The accumulator restarts per
/// call, so one invocation per ticker keeps tickers independent.
pub fn cumulative_returns(daily: &[Option<f64>]) -> Vec<f64> {
    let mut result = Vec::with_capacity(daily.len());
    let mut growth = 1.0;
    for r in daily {
        growth *= 1.0 + r.unwrap_or(0.0);
        result.push(growth - 1.0);
    }
    result
}

/// Final cumulative return per ticker, in alphabetical ticker order.
pub fn final_cumulative_returns(series: &PriceSeries) -> Vec<(String, f64)> {
    series
        .iter()
        .filter_map(|(ticker, obs)| {
            let daily: Vec<Option<f64>> = obs.iter().map(|o| o.daily_return).collect();
            cumulative_returns(&daily)
                .last()
                .map(|&cum| (ticker.clone(), cum))
        })
        .collect()
}

/// Top `n` tickers by final cumulative return.
///
/// Descending, with exact ties keeping alphabetical ticker order.
pub fn top_cumulative(series: &PriceSeries, n: usize) -> Vec<(String, f64)> {
    let mut ranked = final_cumulative_returns(series);
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// Build the date-indexed cumulative return table for the given tickers.
///
/// The date index is the ascending union of the selected tickers' trading
/// dates; a ticker's cell is `None` on dates it did not trade. Unknown
/// tickers are skipped.
pub fn cumulative_table(series: &PriceSeries, tickers: &[String]) -> CumulativeTable {
    let mut date_index: BTreeSet<NaiveDate> = BTreeSet::new();
    for ticker in tickers {
        if let Some(obs) = series.get(ticker) {
            date_index.extend(obs.iter().map(|o| o.date));
        }
    }
    let dates: Vec<NaiveDate> = date_index.into_iter().collect();

    let mut table_series = Vec::new();
    for ticker in tickers {
        let Some(obs) = series.get(ticker) else {
            continue;
        };
        let daily: Vec<Option<f64>> = obs.iter().map(|o| o.daily_return).collect();
        let cumulative = cumulative_returns(&daily);
        let by_date: HashMap<NaiveDate, f64> = obs
            .iter()
            .zip(cumulative)
            .map(|(o, c)| (o.date, c))
            .collect();
        let values = dates.iter().map(|d| by_date.get(d).copied()).collect();
        table_series.push(TickerSeries {
            ticker: ticker.clone(),
            values,
        });
    }

    CumulativeTable {
        dates,
        series: table_series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Observation;
    use chrono::NaiveDate;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn series_of(closes: &[(&str, &[f64])]) -> PriceSeries {
        let mut observations = Vec::new();
        for (ticker, values) in closes {
            for (i, &close) in values.iter().enumerate() {
                observations.push(Observation::new(ticker, d(2024, 1, 2 + i as u32), close));
            }
        }
        PriceSeries::from_observations(observations)
    }

    #[test]
    fn test_daily_returns_first_is_none() {
        let daily = daily_returns(&[100.0, 110.0, 121.0]);
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0], None);
        assert!((daily[1].unwrap() - 0.10).abs() < 1e-12);
        assert!((daily[2].unwrap() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_daily_returns_zero_denominator() {
        let daily = daily_returns(&[50.0, 0.0, 60.0]);
        assert!((daily[1].unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(daily[2], None);
    }

    #[test]
    fn test_cumulative_returns_compound() {
        let daily = vec![None, Some(0.10), Some(0.10)];
        let cumulative = cumulative_returns(&daily);
        assert_eq!(cumulative.len(), 3);
        assert!((cumulative[0] - 0.0).abs() < 1e-12);
        assert!((cumulative[1] - 0.10).abs() < 1e-12);
        // 1.10 * 1.10 - 1 = 0.21
        assert!((cumulative[2] - 0.21).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_returns_no_lookahead() {
        // Truncating the input must not change earlier entries.
        let daily = vec![None, Some(0.05), Some(-0.02), Some(0.10)];
        let full = cumulative_returns(&daily);
        let partial = cumulative_returns(&daily[..2]);
        assert_eq!(full[..2], partial[..]);
    }

    #[test]
    fn test_round_trip_reconstruction() {
        let closes = vec![100.0, 104.0, 99.5, 107.25, 107.25];
        let daily = daily_returns(&closes);

        let mut rebuilt = vec![closes[0]];
        for r in daily.iter().skip(1) {
            let prev = *rebuilt.last().unwrap();
            rebuilt.push(prev * (1.0 + r.unwrap()));
        }
        for (a, b) in closes.iter().zip(&rebuilt) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_final_cumulative_returns() {
        let series = series_of(&[
            ("AAPL", &[100.0, 110.0, 121.0]),
            ("MSFT", &[50.0, 50.0, 25.0]),
        ]);
        let finals = final_cumulative_returns(&series);

        assert_eq!(finals.len(), 2);
        assert_eq!(finals[0].0, "AAPL");
        assert!((finals[0].1 - 0.21).abs() < 1e-12);
        assert!((finals[1].1 + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_top_cumulative_orders_descending() {
        let series = series_of(&[
            ("AAPL", &[100.0, 110.0]),
            ("MSFT", &[100.0, 130.0]),
            ("NVDA", &[100.0, 90.0]),
        ]);
        let top = top_cumulative(&series, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "MSFT");
        assert_eq!(top[1].0, "AAPL");
    }

    #[test]
    fn test_top_cumulative_tie_break_alphabetical() {
        let series = series_of(&[
            ("ZZZ", &[100.0, 110.0]),
            ("AAA", &[200.0, 220.0]),
            ("MMM", &[100.0, 90.0]),
        ]);
        let top = top_cumulative(&series, 2);

        // ZZZ and AAA both returned exactly 10%; AAA wins the tie.
        assert_eq!(top[0].0, "AAA");
        assert_eq!(top[1].0, "ZZZ");
    }

    #[test]
    fn test_cumulative_table_alignment() {
        let mut observations = vec![
            Observation::new("AAPL", d(2024, 1, 2), 100.0),
            Observation::new("AAPL", d(2024, 1, 3), 110.0),
            Observation::new("MSFT", d(2024, 1, 3), 50.0),
            Observation::new("MSFT", d(2024, 1, 4), 55.0),
        ];
        observations.rotate_left(1);
        let series = PriceSeries::from_observations(observations);

        let table = cumulative_table(&series, &["AAPL".to_string(), "MSFT".to_string()]);
        assert_eq!(table.dates, vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)]);

        let aapl = &table.series[0];
        assert_eq!(aapl.values[2], None); // AAPL never traded Jan 4
        assert!((aapl.values[1].unwrap() - 0.10).abs() < 1e-12);

        let msft = &table.series[1];
        assert_eq!(msft.values[0], None); // MSFT never traded Jan 2
        assert!((msft.values[2].unwrap() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_table_skips_unknown_ticker() {
        let series = series_of(&[("AAPL", &[100.0, 110.0])]);
        let table = cumulative_table(&series, &["AAPL".to_string(), "NOPE".to_string()]);
        assert_eq!(table.series.len(), 1);
    }
}
