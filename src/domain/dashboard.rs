//! One render pass: fetch a ticker's history, compute the frame and the
//! return distribution that the presentation layer draws.

use chrono::NaiveDate;
use log::{info, warn};

use crate::domain::error::StockscopeError;
use crate::domain::frame::{compute_indicators, IndicatorFrame};
use crate::domain::indicator::stats::{histogram, Histogram, ReturnStats};
use crate::domain::settings::Settings;
use crate::ports::data_port::MarketDataPort;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub ticker: String,
    /// Every ticker the user can switch to.
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frame: IndicatorFrame,
    pub return_stats: Option<ReturnStats>,
    pub return_histogram: Option<Histogram>,
}

pub fn build_dashboard(
    data_port: &dyn MarketDataPort,
    ticker: &str,
    tickers: &[String],
    settings: &Settings,
) -> Result<Dashboard, StockscopeError> {
    info!(
        "Fetching {} from {} to {}",
        ticker, settings.start_date, settings.end_date
    );
    let series = data_port.fetch_history(ticker, settings.start_date, settings.end_date)?;
    if series.is_empty() {
        return Err(StockscopeError::data_unavailable(
            ticker,
            "provider returned no rows for the requested range",
        ));
    }

    let frame = compute_indicators(&series, &settings.indicators);
    if frame.has_insufficient_history() {
        warn!(
            "{} has {} bars; {} are needed for every indicator, leading values stay undefined",
            ticker,
            frame.len(),
            settings.indicators.required_history()
        );
    }
    info!("Computed indicators over {} bars for {}", frame.len(), ticker);

    let return_stats = ReturnStats::compute(&frame.daily_return);
    let return_histogram = histogram(&frame.daily_return, settings.histogram_bins);

    Ok(Dashboard {
        ticker: ticker.to_string(),
        tickers: tickers.to_vec(),
        start_date: settings.start_date,
        end_date: settings.end_date,
        frame,
        return_stats,
        return_histogram,
    })
}

/// Tickers the dashboard offers, upper-cased: configured ones, else whatever
/// the data source can enumerate, else the built-in list.
pub fn resolve_tickers(settings: &Settings, data_port: &dyn MarketDataPort) -> Vec<String> {
    if let Some(configured) = &settings.tickers {
        return configured.clone();
    }
    match data_port.list_tickers() {
        Ok(found) if !found.is_empty() => found.into_iter().map(|t| t.to_uppercase()).collect(),
        Ok(_) => settings.tickers_or_default(),
        Err(e) => {
            warn!("Could not list tickers, using defaults: {}", e);
            settings.tickers_or_default()
        }
    }
}

/// The requested ticker (upper-cased), or the first selectable one.
pub fn select_ticker(requested: Option<&str>, tickers: &[String]) -> Option<String> {
    match requested {
        Some(t) if !t.trim().is_empty() => Some(t.trim().to_uppercase()),
        _ => tickers.first().cloned(),
    }
}
