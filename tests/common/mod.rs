#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use stockscope::adapters::file_config_adapter::FileConfigAdapter;
use stockscope::domain::error::StockscopeError;
pub use stockscope::domain::ohlcv::{PriceBar, PriceSeries};
use stockscope::domain::settings::Settings;
use stockscope::ports::data_port::MarketDataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_history(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, StockscopeError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(StockscopeError::data_unavailable(ticker, reason.clone()));
        }
        let bars = self
            .data
            .get(ticker)
            .ok_or_else(|| StockscopeError::data_unavailable(ticker, "unknown ticker"))?
            .iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .cloned()
            .collect();
        PriceSeries::new(ticker, bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, StockscopeError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Consecutive calendar days starting at `start_date`, one bar per close.
pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000 + i as i64,
        })
        .collect()
}

/// A steadily rising series: close = start_price + i.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    bars_from_closes(start_date, &closes)
}

/// A series that oscillates so every indicator takes interior values.
pub fn generate_wave(start_date: &str, count: usize, base: f64) -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..count)
        .map(|i| base + 5.0 * ((i as f64) / 4.0).sin() + i as f64 * 0.1)
        .collect();
    bars_from_closes(start_date, &closes)
}

pub fn settings_from(ini: &str) -> Settings {
    Settings::from_config(&FileConfigAdapter::from_string(ini).unwrap()).unwrap()
}

pub fn settings_for_2024() -> Settings {
    settings_from(
        "[dashboard]\nstart_date = 2024-01-01\nend_date = 2024-12-31\n\n[report]\nhistogram_bins = 10\n",
    )
}

pub fn write_csv(dir: &std::path::Path, ticker: &str, bars: &[PriceBar]) {
    let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", ticker)), content).unwrap();
}
