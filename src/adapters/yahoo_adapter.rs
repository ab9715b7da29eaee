//! Yahoo Finance chart API data adapter.
//!
//! Fetches daily bars from the v8 chart endpoint. Rows with any null field
//! are skipped. Timestamps are shifted by the exchange's GMT offset before
//! taking the trading date.

use chrono::{DateTime, NaiveDate, NaiveTime};
use log::{debug, info};
use serde::Deserialize;

use crate::domain::error::StockscopeError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::MarketDataPort;

pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

pub struct YahooAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, StockscopeError> {
        Self::with_base_url(YAHOO_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, StockscopeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (stockscope)")
            .build()
            .map_err(|e| StockscopeError::data_unavailable("*", format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn chart_url(&self, ticker: &str, start_date: NaiveDate, end_date: NaiveDate) -> String {
        // period2 is exclusive upstream; move it past end_date so that day is included.
        let period1 = unix_midnight(start_date);
        let period2 = unix_midnight(end_date) + 86_400;
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url, ticker, period1, period2
        )
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Decodes a chart API body into bars, without any date filtering.
fn parse_chart(ticker: &str, body: &str) -> Result<Vec<PriceBar>, StockscopeError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| StockscopeError::data_unavailable(ticker, format!("malformed response: {}", e)))?;

    if let Some(error) = response.chart.error {
        return Err(StockscopeError::data_unavailable(
            ticker,
            format!("{}: {}", error.code, error.description),
        ));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| StockscopeError::data_unavailable(ticker, "empty chart result"))?;

    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) =
            (open, high, low, close, volume)
        else {
            debug!("{}: skipping incomplete row at {}", ticker, ts);
            continue;
        };

        let Some(moment) = ts
            .checked_add(offset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
        else {
            debug!("{}: skipping out-of-range timestamp {}", ticker, ts);
            continue;
        };

        bars.push(PriceBar {
            date: moment.date_naive(),
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(bars)
}

impl MarketDataPort for YahooAdapter {
    fn fetch_history(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, StockscopeError> {
        let url = self.chart_url(ticker, start_date, end_date);
        info!("Fetching Yahoo data from: {}", url);

        let body = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.text())
            .map_err(|e| StockscopeError::data_unavailable(ticker, format!("request failed: {}", e)))?;

        let mut bars: Vec<PriceBar> = parse_chart(ticker, &body)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();

        // The live session can repeat the last trading day; keep one bar per date.
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        info!("Fetched {} bars for {}", bars.len(), ticker);
        PriceSeries::new(ticker, bars)
    }
}
