//! HTTP error responses for web adapter.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::adapters::html_report_adapter::render_error_page;
use crate::domain::error::StockscopeError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
    /// Offered on the error page so the user can pick another ticker.
    pub tickers: Vec<String>,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            tickers: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_tickers(mut self, tickers: &[String]) -> Self {
        self.tickers = tickers.to_vec();
        self
    }
}

pub fn status_from_error(err: &StockscopeError) -> StatusCode {
    match err {
        StockscopeError::DataUnavailable { .. } | StockscopeError::InvalidSeries { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        StockscopeError::ConfigMissing { .. }
        | StockscopeError::ConfigInvalid { .. }
        | StockscopeError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
        StockscopeError::Render { .. } | StockscopeError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<StockscopeError> for WebError {
    fn from(err: StockscopeError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let title = self.status.canonical_reason().unwrap_or("Error");
        match render_error_page(title, &self.message, &self.tickers) {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
