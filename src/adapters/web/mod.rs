//! Web dashboard adapter.
//!
//! Serves the same HTML dashboard as the `analyze` command, with a ticker
//! selector that reloads the page for the chosen ticker.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::domain::settings::Settings;
use crate::ports::data_port::MarketDataPort;

pub struct AppState {
    pub data_port: Arc<dyn MarketDataPort + Send + Sync>,
    pub settings: Settings,
    /// Tickers offered by the selector; requests for anything else are rejected.
    pub tickers: Vec<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/table.csv", get(handlers::table_csv))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}
