//! HTTP request handlers for web adapter.

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use log::{debug, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::frame_csv::write_frame_csv;
use crate::adapters::html_report_adapter::render_dashboard;
use crate::domain::dashboard::{build_dashboard, select_ticker, Dashboard};

use super::{AppState, WebError};

#[derive(Debug, Default, Deserialize)]
pub struct TickerQuery {
    pub ticker: Option<String>,
}

/// Fetch and compute off the async runtime; providers may block on I/O.
async fn load_dashboard(state: Arc<AppState>, query: TickerQuery) -> Result<Dashboard, WebError> {
    let ticker = select_ticker(query.ticker.as_deref(), &state.tickers)
        .ok_or_else(|| WebError::bad_request("No tickers configured"))?;
    if !state.tickers.contains(&ticker) {
        return Err(WebError::bad_request(format!("Unknown ticker: {}", ticker))
            .with_tickers(&state.tickers));
    }
    debug!("Dashboard request for {}", ticker);

    let worker_state = Arc::clone(&state);
    tokio::task::spawn_blocking(move || {
        build_dashboard(
            worker_state.data_port.as_ref(),
            &ticker,
            &worker_state.tickers,
            &worker_state.settings,
        )
    })
    .await
    .map_err(|e| WebError::internal(format!("Worker failed: {}", e)))?
    .map_err(|e| {
        warn!("{}", e);
        WebError::from(e).with_tickers(&state.tickers)
    })
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TickerQuery>,
) -> Result<Response, WebError> {
    let dashboard = load_dashboard(state, query).await?;
    let html = render_dashboard(&dashboard, true)?;
    Ok(Html(html).into_response())
}

pub async fn table_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TickerQuery>,
) -> Result<Response, WebError> {
    let dashboard = load_dashboard(state, query).await?;
    let mut body = Vec::new();
    write_frame_csv(&dashboard.frame, &mut body)?;

    let disposition = format!("attachment; filename=\"{}.csv\"", dashboard.ticker);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
