//! Cross-ticker correlation of daily returns.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::PriceSeries;
use crate::types::CorrelationMatrix;

/// Date-by-ticker pivot of daily returns.
///
/// Rows are the ascending union of every observed trading date, columns are
/// tickers in alphabetical order. A cell is `None` where the ticker has no
/// defined return that date (no observation, the ticker's first day, or an
/// undefined division) - never zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnMatrix {
    /// Ascending date index
    pub dates: Vec<NaiveDate>,
    /// Column order
    pub tickers: Vec<String>,
    /// One column per ticker, aligned to `dates`
    pub columns: Vec<Vec<Option<f64>>>,
}

/// Pivot a price series into a date-indexed return matrix.
pub fn build_return_matrix(series: &PriceSeries) -> ReturnMatrix {
    let mut date_index: BTreeSet<NaiveDate> = BTreeSet::new();
    for (_, obs) in series.iter() {
        date_index.extend(obs.iter().map(|o| o.date));
    }
    let dates: Vec<NaiveDate> = date_index.into_iter().collect();

    let mut tickers = Vec::with_capacity(series.len());
    let mut columns = Vec::with_capacity(series.len());
    for (ticker, obs) in series.iter() {
        let by_date: HashMap<NaiveDate, Option<f64>> =
            obs.iter().map(|o| (o.date, o.daily_return)).collect();
        let column: Vec<Option<f64>> = dates
            .iter()
            .map(|d| by_date.get(d).copied().flatten())
            .collect();
        tickers.push(ticker.clone());
        columns.push(column);
    }

    ReturnMatrix {
        dates,
        tickers,
        columns,
    }
}

/// Pearson correlation between two equally long samples.
///
/// `None` with fewer than two points or when either sample is constant
/// (zero variance leaves the coefficient undefined).
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Pairwise correlation matrix over a return matrix.
///
/// Each pair is correlated over the dates where both columns are defined
/// (per-pair intersection, not a matrix-wide one). Undefined coefficients
/// are substituted with 0 for display; the diagonal is forced to 1. Only
/// the upper triangle is computed and then mirrored, so the result is
/// symmetric by construction.
pub fn correlation_matrix(matrix: &ReturnMatrix) -> CorrelationMatrix {
    let n = matrix.tickers.len();
    let mut values = vec![vec![0.0; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = matrix.columns[i]
                .iter()
                .zip(&matrix.columns[j])
                .filter_map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => Some((*a, *b)),
                    _ => None,
                })
                .unzip();
            // Display substitution: an undefined pair renders as 0.
            let coefficient = pearson(&xs, &ys).unwrap_or(0.0);
            values[i][j] = coefficient;
            values[j][i] = coefficient;
        }
    }

    CorrelationMatrix {
        tickers: matrix.tickers.clone(),
        values,
    }
}
