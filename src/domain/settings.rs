//! Resolved dashboard settings, built from a validated [`ConfigPort`].

use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

use crate::domain::config_validation::{parse_date, parse_ma_windows, validate_config};
use crate::domain::error::StockscopeError;
use crate::domain::frame::IndicatorConfig;
use crate::domain::indicator::signal::SignalThresholds;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_TICKERS: [&str; 6] = ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "NFLX"];
pub const DEFAULT_START_DATE: &str = "2014-05-31";
pub const DEFAULT_END_DATE: &str = "2024-05-31";
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Csv,
    Yahoo,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Csv => write!(f, "csv"),
            DataSource::Yahoo => write!(f, "yahoo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: DataSource,
    pub data_dir: PathBuf,
    /// Configured tickers; `None` means ask the data source.
    pub tickers: Option<Vec<String>>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub indicators: IndicatorConfig,
    pub histogram_bins: usize,
    pub output: PathBuf,
    pub listen: String,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockscopeError> {
        validate_config(config)?;

        let source = match config.get_string("data", "source").as_deref() {
            Some("yahoo") => DataSource::Yahoo,
            _ => DataSource::Csv,
        };

        let tickers = config
            .get_list("dashboard", "tickers")
            .map(|list| list.into_iter().map(|t| t.to_uppercase()).collect());

        let start_date = parse_date(
            "dashboard",
            "start_date",
            &config
                .get_string("dashboard", "start_date")
                .unwrap_or_else(|| DEFAULT_START_DATE.to_string()),
        )?;
        let end_date = parse_date(
            "dashboard",
            "end_date",
            &config
                .get_string("dashboard", "end_date")
                .unwrap_or_else(|| DEFAULT_END_DATE.to_string()),
        )?;
        if start_date >= end_date {
            return Err(StockscopeError::config_invalid(
                "dashboard",
                "start_date",
                "start_date must be before end_date",
            ));
        }

        let ma_windows = match config.get_string("indicators", "ma_windows") {
            Some(raw) => parse_ma_windows(&raw)?,
            None => IndicatorConfig::default().ma_windows,
        };

        let indicators = IndicatorConfig {
            ma_windows,
            rsi_window: config.get_int("indicators", "rsi_window", 14) as usize,
            thresholds: SignalThresholds {
                overbought: config.get_double("indicators", "overbought", 70.0),
                oversold: config.get_double("indicators", "oversold", 30.0),
            },
        };

        Ok(Self {
            source,
            data_dir: PathBuf::from(
                config
                    .get_string("data", "data_dir")
                    .unwrap_or_else(|| "data".to_string()),
            ),
            tickers,
            start_date,
            end_date,
            indicators,
            histogram_bins: config.get_int("report", "histogram_bins", DEFAULT_HISTOGRAM_BINS as i64)
                as usize,
            output: PathBuf::from(
                config
                    .get_string("report", "output")
                    .unwrap_or_else(|| "dashboard.html".to_string()),
            ),
            listen: config
                .get_string("web", "listen")
                .unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
        })
    }

    /// Configured tickers, or the built-in list when none are configured.
    pub fn tickers_or_default(&self) -> Vec<String> {
        match &self.tickers {
            Some(list) => list.clone(),
            None => DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
        }
    }
}
