//! Daily OHLCV bars and the validated price series built from them.

use crate::domain::error::StockscopeError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Bars for one ticker, one per trading date, dates strictly increasing.
///
/// Non-trading days are simply absent; no gap filling is performed.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting out-of-order or duplicate dates.
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, StockscopeError> {
        let ticker = ticker.into();
        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            let reason = if pair[1].date == pair[0].date {
                format!("duplicate date {}", pair[1].date)
            } else {
                format!("date {} follows {}", pair[1].date, pair[0].date)
            };
            return Err(StockscopeError::InvalidSeries { ticker, reason });
        }
        Ok(Self { ticker, bars })
    }

    /// Sorts the bars by date before validating. Duplicates are still rejected.
    pub fn from_unsorted(
        ticker: impl Into<String>,
        mut bars: Vec<PriceBar>,
    ) -> Result<Self, StockscopeError> {
        bars.sort_by_key(|b| b.date);
        Self::new(ticker, bars)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// First and last trading date, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.bars.first()?.date, self.bars.last()?.date))
    }
}
