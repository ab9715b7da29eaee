//! Market data access port trait.

use crate::domain::error::StockscopeError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// Daily history for `ticker` between `start_date` and `end_date`.
    ///
    /// Unknown tickers and unreachable providers fail with
    /// [`StockscopeError::DataUnavailable`]. An empty series is returned as-is.
    fn fetch_history(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, StockscopeError>;

    /// Tickers the provider can serve without being told. Providers that
    /// cannot enumerate return an empty list.
    fn list_tickers(&self) -> Result<Vec<String>, StockscopeError> {
        Ok(Vec::new())
    }
}
