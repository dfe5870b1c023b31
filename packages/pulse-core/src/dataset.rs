//! File-backed dataset loading.
//!
//! The ingestion boundary of the crate: one JSON document holding the raw
//! `prices` and `stocks` tables, loaded once into an immutable [`Dataset`].
//! Everything downstream is pure computation over the snapshot.

use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::{PriceSeries, RawPriceRow};
use crate::types::TickerInfo;
use crate::{Error, Result};

/// One row of the raw `stocks` table, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawStockRow {
    ticker: Option<String>,
    company: Option<String>,
    sector: Option<String>,
}

/// On-disk dataset document: `{"prices": [...], "stocks": [...]}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDataset {
    prices: Vec<RawPriceRow>,
    stocks: Vec<RawStockRow>,
}

/// An immutable snapshot of the price history and the ticker reference
/// table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Daily price observations, grouped by ticker
    pub prices: PriceSeries,
    /// Ticker reference table (one row per ticker)
    pub stocks: Vec<TickerInfo>,
}

impl Dataset {
    /// Load a dataset from a JSON file.
    ///
    /// Malformed rows are logged and skipped. Fails only when the file
    /// cannot be read or parsed, or when no usable price row survives.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let raw: RawDataset = serde_json::from_str(&content)?;
        let dataset = Self::from_raw(raw);
        if dataset.prices.is_empty() {
            return Err(Error::EmptyDataset(path.display().to_string()));
        }
        tracing::debug!(
            tickers = dataset.prices.len(),
            observations = dataset.prices.observation_count(),
            stocks = dataset.stocks.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Load from the default path (see [`Dataset::default_path`]).
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path())
    }

    /// Get the default dataset file path.
    ///
    /// Default path: `~/.pulse/dataset.json`.
    /// Can be overridden with the `PULSE_DATA_FILE` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("PULSE_DATA_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".pulse/dataset.json"))
            .unwrap_or_else(|| PathBuf::from("dataset.json"))
    }

    fn from_raw(raw: RawDataset) -> Self {
        let prices = PriceSeries::from_rows(raw.prices);

        let mut seen: HashSet<String> = HashSet::new();
        let mut stocks = Vec::new();
        for row in raw.stocks {
            let ticker = match row.ticker {
                Some(ref t) if !t.trim().is_empty() => t.trim().to_uppercase(),
                _ => {
                    tracing::warn!("skipping stock row without ticker");
                    continue;
                }
            };
            let sector = match row.sector {
                Some(s) if !s.trim().is_empty() => s,
                _ => {
                    tracing::warn!(ticker = %ticker, "skipping stock row without sector");
                    continue;
                }
            };
            if !seen.insert(ticker.clone()) {
                tracing::warn!(ticker = %ticker, "dropping duplicate stock row");
                continue;
            }
            stocks.push(TickerInfo {
                ticker,
                company: row.company.unwrap_or_default(),
                sector,
            });
        }

        Self { prices, stocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_dataset(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_dataset() {
        let file = write_dataset(
            r#"{
                "prices": [
                    {"ticker": "aapl", "date": "2024-01-02", "open": 99.0, "high": 101.0, "low": 98.5, "close": 100.0, "volume": 1000.0},
                    {"ticker": "aapl", "date": "2024-01-03", "close": 110.0}
                ],
                "stocks": [
                    {"ticker": "aapl", "company": "Apple", "sector": "Technology"}
                ]
            }"#,
        );
        let dataset = Dataset::load(file.path()).unwrap();

        assert_eq!(dataset.prices.tickers(), vec!["AAPL"]);
        assert_eq!(dataset.prices.observation_count(), 2);
        assert_eq!(dataset.stocks.len(), 1);
        assert_eq!(dataset.stocks[0].ticker, "AAPL");
    }

    #[test]
    fn test_load_skips_bad_rows_but_keeps_rest() {
        let file = write_dataset(
            r#"{
                "prices": [
                    {"ticker": "aapl", "date": "2024-01-02", "close": 100.0},
                    {"date": "2024-01-02", "close": 1.0},
                    {"ticker": "msft", "date": "2024-01-02"}
                ],
                "stocks": [
                    {"ticker": "aapl", "company": "Apple", "sector": "Technology"},
                    {"company": "Nameless", "sector": "Energy"},
                    {"ticker": "xom", "company": "Exxon"},
                    {"ticker": "aapl", "company": "Apple again", "sector": "Technology"}
                ]
            }"#,
        );
        let dataset = Dataset::load(file.path()).unwrap();

        assert_eq!(dataset.prices.observation_count(), 1);
        assert_eq!(dataset.stocks.len(), 1);
    }

    #[test]
    fn test_load_empty_prices_is_an_error() {
        let file = write_dataset(r#"{"prices": [], "stocks": []}"#);
        assert!(matches!(
            Dataset::load(file.path()),
            Err(Error::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Dataset::load(Path::new("/nonexistent/pulse-dataset.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_invalid_json_is_json_error() {
        let file = write_dataset("not json at all");
        assert!(matches!(Dataset::load(file.path()), Err(Error::Json(_))));
    }
}
