//! CSV directory data adapter.
//!
//! One file per ticker, `<TICKER>.csv`, with a header row naming at least
//! `date, open, high, low, close, volume` (any order, any case). Extra
//! columns such as `Adj Close` are ignored. Tickers are upper-case; file
//! names are matched ignoring case.

use crate::domain::error::StockscopeError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use log::debug;
use std::fs;
use std::path::PathBuf;

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// `<TICKER>.csv`, falling back to a file whose stem matches ignoring case.
    fn csv_path(&self, ticker: &str) -> PathBuf {
        let exact = self.base_path.join(format!("{}.csv", ticker));
        if exact.is_file() {
            return exact;
        }
        fs::read_dir(&self.base_path)
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| entry.path())
            .find(|path| {
                path.extension().and_then(|e| e.to_str()) == Some("csv")
                    && path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|stem| stem.eq_ignore_ascii_case(ticker))
            })
            .unwrap_or(exact)
    }
}

struct ColumnIndex {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnIndex {
    fn from_headers(ticker: &str, headers: &csv::StringRecord) -> Result<Self, StockscopeError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| StockscopeError::data_unavailable(ticker, format!("missing {} column", name)))
        };
        Ok(Self {
            date: find(REQUIRED_COLUMNS[0])?,
            open: find(REQUIRED_COLUMNS[1])?,
            high: find(REQUIRED_COLUMNS[2])?,
            low: find(REQUIRED_COLUMNS[3])?,
            close: find(REQUIRED_COLUMNS[4])?,
            volume: find(REQUIRED_COLUMNS[5])?,
        })
    }
}

fn field<'r>(
    ticker: &str,
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<&'r str, StockscopeError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| StockscopeError::data_unavailable(ticker, format!("missing {} value", name)))
}

fn parse_price(ticker: &str, raw: &str, name: &str) -> Result<f64, StockscopeError> {
    raw.parse()
        .map_err(|e| StockscopeError::data_unavailable(ticker, format!("invalid {} value '{}': {}", name, raw, e)))
}

/// Volumes are integers, but some exports write them as `1234.0`.
fn parse_volume(ticker: &str, raw: &str) -> Result<i64, StockscopeError> {
    raw.parse::<i64>()
        .or_else(|_| raw.parse::<f64>().map(|v| v as i64))
        .map_err(|e| StockscopeError::data_unavailable(ticker, format!("invalid volume value '{}': {}", raw, e)))
}

impl MarketDataPort for CsvAdapter {
    fn fetch_history(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, StockscopeError> {
        let path = self.csv_path(ticker);
        debug!("Reading {}", path.display());
        let content = fs::read_to_string(&path).map_err(|e| {
            StockscopeError::data_unavailable(ticker, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| StockscopeError::data_unavailable(ticker, format!("CSV header error: {}", e)))?
            .clone();
        let columns = ColumnIndex::from_headers(ticker, &headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result
                .map_err(|e| StockscopeError::data_unavailable(ticker, format!("CSV parse error: {}", e)))?;

            let date_str = field(ticker, &record, columns.date, "date")?;
            // Timestamped exports ("2024-01-02 00:00:00-05:00") keep the date part.
            let date_part = date_str.get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
                StockscopeError::data_unavailable(ticker, format!("invalid date '{}': {}", date_str, e))
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: parse_price(ticker, field(ticker, &record, columns.open, "open")?, "open")?,
                high: parse_price(ticker, field(ticker, &record, columns.high, "high")?, "high")?,
                low: parse_price(ticker, field(ticker, &record, columns.low, "low")?, "low")?,
                close: parse_price(ticker, field(ticker, &record, columns.close, "close")?, "close")?,
                volume: parse_volume(ticker, field(ticker, &record, columns.volume, "volume")?)?,
            });
        }

        PriceSeries::from_unsorted(ticker, bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, StockscopeError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            StockscopeError::data_unavailable(
                "*",
                format!("failed to read directory {}: {}", self.base_path.display(), e),
            )
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StockscopeError::data_unavailable("*", format!("directory entry error: {}", e))
            })?;

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    tickers.push(stem.to_uppercase());
                }
            }
        }

        tickers.sort();
        tickers.dedup();
        Ok(tickers)
    }
}
