//! Configuration validation.
//!
//! Validates every config field before any data is fetched. Missing keys are
//! fine (they fall back to defaults); present keys must be well-formed.

use crate::domain::error::StockscopeError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    validate_source(config)?;
    validate_tickers(config)?;
    validate_dates(config)?;
    validate_ma_windows(config)?;
    validate_rsi_window(config)?;
    validate_thresholds(config)?;
    validate_histogram_bins(config)?;
    Ok(())
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    match config.get_string("data", "source").as_deref() {
        None | Some("csv") | Some("yahoo") => Ok(()),
        Some(other) => Err(StockscopeError::config_invalid(
            "data",
            "source",
            format!("unknown source '{}' (expected csv or yahoo)", other),
        )),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    if let Some(tickers) = config.get_list("dashboard", "tickers") {
        if tickers.is_empty() {
            return Err(StockscopeError::config_invalid(
                "dashboard",
                "tickers",
                "at least one ticker is required",
            ));
        }
    }
    Ok(())
}

pub fn parse_date(section: &str, key: &str, value: &str) -> Result<NaiveDate, StockscopeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        StockscopeError::config_invalid(section, key, "invalid date format (expected YYYY-MM-DD)")
    })
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    let start = config
        .get_string("dashboard", "start_date")
        .map(|s| parse_date("dashboard", "start_date", &s))
        .transpose()?;
    let end = config
        .get_string("dashboard", "end_date")
        .map(|s| parse_date("dashboard", "end_date", &s))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(StockscopeError::config_invalid(
                "dashboard",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

pub fn parse_ma_windows(raw: &str) -> Result<Vec<usize>, StockscopeError> {
    let mut windows = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let window: usize = part.parse().map_err(|_| {
            StockscopeError::config_invalid(
                "indicators",
                "ma_windows",
                format!("'{}' is not a window length", part),
            )
        })?;
        if window == 0 {
            return Err(StockscopeError::config_invalid(
                "indicators",
                "ma_windows",
                "windows must be positive",
            ));
        }
        windows.push(window);
    }

    if windows.is_empty() {
        return Err(StockscopeError::config_invalid(
            "indicators",
            "ma_windows",
            "at least one window is required",
        ));
    }
    Ok(windows)
}

fn validate_ma_windows(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    if let Some(raw) = config.get_string("indicators", "ma_windows") {
        parse_ma_windows(&raw)?;
    }
    Ok(())
}

/// Present values must parse; absent ones take `default`.
fn parse_value<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, StockscopeError> {
    match config.get_string(section, key) {
        Some(raw) => raw.parse().map_err(|_| {
            StockscopeError::config_invalid(section, key, format!("'{}' is not a number", raw))
        }),
        None => Ok(default),
    }
}

fn validate_rsi_window(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    let value: i64 = parse_value(config, "indicators", "rsi_window", 14)?;
    if value <= 0 {
        return Err(StockscopeError::config_invalid(
            "indicators",
            "rsi_window",
            "rsi_window must be positive",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    let overbought: f64 = parse_value(config, "indicators", "overbought", 70.0)?;
    let oversold: f64 = parse_value(config, "indicators", "oversold", 30.0)?;

    for (key, value) in [("overbought", overbought), ("oversold", oversold)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(StockscopeError::config_invalid(
                "indicators",
                key,
                format!("{} must be between 0 and 100", key),
            ));
        }
    }

    if oversold >= overbought {
        return Err(StockscopeError::config_invalid(
            "indicators",
            "oversold",
            "oversold must be below overbought",
        ));
    }
    Ok(())
}

fn validate_histogram_bins(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    let bins: i64 = parse_value(config, "report", "histogram_bins", 50)?;
    if bins <= 0 {
        return Err(StockscopeError::config_invalid(
            "report",
            "histogram_bins",
            "histogram_bins must be positive",
        ));
    }
    Ok(())
}
