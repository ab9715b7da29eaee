//! HTML dashboard adapter implementing ReportPort.
//!
//! Renders the dashboard with Askama templates and inline SVG charts. The
//! same page is served by the web feature, where the ticker selector
//! submits back to the server.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::adapters::chart_svg::{
    format_percent, format_price, histogram_svg, line_chart_svg, ma_color, rsi_chart_svg,
    LineSeries, PRICE_COLOR,
};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::StockscopeError;
use crate::ports::report_port::ReportPort;

pub struct TickerOption {
    pub name: String,
    pub selected: bool,
}

struct StatRow {
    label: &'static str,
    value: String,
}

struct TableRow {
    date: String,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: i64,
    moving_averages: Vec<String>,
    daily_return: String,
    cumulative_return: String,
    rsi: String,
    signal: &'static str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    ticker: String,
    tickers: Vec<TickerOption>,
    interactive: bool,
    /// Percent-encoded `ticker=...` query for the CSV download link.
    table_query: String,
    start_date: String,
    end_date: String,
    warning: Option<String>,
    price_svg: String,
    moving_average_svg: String,
    histogram_svg: String,
    cumulative_svg: String,
    rsi_svg: String,
    stats: Vec<StatRow>,
    ma_headers: Vec<String>,
    rows: Vec<TableRow>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    title: &'a str,
    message: &'a str,
    tickers: Vec<TickerOption>,
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_default()
}

pub fn ticker_options(tickers: &[String], selected: &str) -> Vec<TickerOption> {
    tickers
        .iter()
        .map(|t| TickerOption {
            name: t.clone(),
            selected: t == selected,
        })
        .collect()
}

fn ticker_query(ticker: &str) -> Result<String, StockscopeError> {
    serde_urlencoded::to_string(&[("ticker", ticker)]).map_err(|e| StockscopeError::Render {
        reason: e.to_string(),
    })
}

fn stat_rows(dashboard: &Dashboard) -> Vec<StatRow> {
    let frame = &dashboard.frame;
    let mut rows = vec![
        StatRow {
            label: "Trading Days",
            value: frame.len().to_string(),
        },
        StatRow {
            label: "Last Close",
            value: fixed(frame.series.bars().last().map(|b| b.close), 2),
        },
        StatRow {
            label: "Total Return",
            value: frame
                .cumulative_return
                .iter()
                .rev()
                .find_map(|v| *v)
                .map(format_percent)
                .unwrap_or_else(|| "n/a".into()),
        },
    ];
    if let Some(stats) = &dashboard.return_stats {
        rows.push(StatRow {
            label: "Mean Daily Return",
            value: format!("{:.3}%", stats.mean * 100.0),
        });
        rows.push(StatRow {
            label: "Daily Volatility",
            value: stats
                .std_dev
                .map(|s| format!("{:.3}%", s * 100.0))
                .unwrap_or_else(|| "n/a".into()),
        });
    }
    rows.push(StatRow {
        label: "Latest RSI",
        value: frame
            .rsi
            .last()
            .copied()
            .flatten()
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "n/a".into()),
    });
    rows.push(StatRow {
        label: "Latest Signal",
        value: frame
            .signal
            .last()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "n/a".into()),
    });
    rows
}

/// Renders the full dashboard page.
pub fn render_dashboard(dashboard: &Dashboard, interactive: bool) -> Result<String, StockscopeError> {
    let frame = &dashboard.frame;
    let dates = frame.dates();
    let closes: Vec<Option<f64>> = frame.closes().into_iter().map(Some).collect();

    let price_svg = line_chart_svg(
        "Price",
        &dates,
        &[LineSeries {
            label: "Closing Price".into(),
            color: PRICE_COLOR,
            values: &closes,
        }],
        format_price,
    );

    let mut ma_series = vec![LineSeries {
        label: "Closing Price".into(),
        color: PRICE_COLOR,
        values: &closes,
    }];
    for (i, (window, values)) in frame.moving_averages.iter().enumerate() {
        ma_series.push(LineSeries {
            label: format!("MA{}", window),
            color: ma_color(i),
            values,
        });
    }
    let moving_average_svg = line_chart_svg("Price", &dates, &ma_series, format_price);

    let histogram_svg = dashboard
        .return_histogram
        .as_ref()
        .map(|h| histogram_svg(h, dashboard.return_stats.as_ref()))
        .unwrap_or_default();

    let cumulative_svg = line_chart_svg(
        "Cumulative Return",
        &dates,
        &[LineSeries {
            label: "Cumulative Return".into(),
            color: PRICE_COLOR,
            values: &frame.cumulative_return,
        }],
        format_percent,
    );

    let rsi_svg = rsi_chart_svg(&dates, &frame.rsi, &frame.config.thresholds);

    let warning = frame.has_insufficient_history().then(|| {
        format!(
            "Only {} trading days in range; {} are needed before every indicator is defined.",
            frame.len(),
            frame.config.required_history()
        )
    });

    let rows = frame
        .rows()
        .map(|row| TableRow {
            date: row.bar.date.to_string(),
            open: format_price(row.bar.open),
            high: format_price(row.bar.high),
            low: format_price(row.bar.low),
            close: format_price(row.bar.close),
            volume: row.bar.volume,
            moving_averages: row.moving_averages.iter().map(|(_, v)| fixed(*v, 2)).collect(),
            daily_return: fixed(row.daily_return, 4),
            cumulative_return: fixed(row.cumulative_return, 4),
            rsi: fixed(row.rsi, 2),
            signal: row.signal.as_str(),
        })
        .collect();

    let template = DashboardTemplate {
        ticker: dashboard.ticker.clone(),
        tickers: ticker_options(&dashboard.tickers, &dashboard.ticker),
        interactive,
        table_query: ticker_query(&dashboard.ticker)?,
        start_date: dashboard.start_date.to_string(),
        end_date: dashboard.end_date.to_string(),
        warning,
        price_svg,
        moving_average_svg,
        histogram_svg,
        cumulative_svg,
        rsi_svg,
        stats: stat_rows(dashboard),
        ma_headers: frame
            .moving_averages
            .keys()
            .map(|w| format!("MA{}", w))
            .collect(),
        rows,
    };

    template.render().map_err(|e| StockscopeError::Render {
        reason: e.to_string(),
    })
}

/// Page shown in place of the dashboard when a ticker cannot be loaded.
pub fn render_error_page(
    title: &str,
    message: &str,
    tickers: &[String],
) -> Result<String, StockscopeError> {
    ErrorTemplate {
        title,
        message,
        tickers: ticker_options(tickers, ""),
    }
    .render()
    .map_err(|e| StockscopeError::Render {
        reason: e.to_string(),
    })
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, dashboard: &Dashboard, output_path: &Path) -> Result<(), StockscopeError> {
        let html = render_dashboard(dashboard, false)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, html)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::{compute_indicators, IndicatorConfig};
    use crate::domain::indicator::stats::{histogram, ReturnStats};
    use crate::domain::ohlcv::{PriceBar, PriceSeries};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_dashboard(closes: &[f64]) -> Dashboard {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000 + i as i64,
            })
            .collect();
        let series = PriceSeries::new("AAPL", bars).unwrap();
        let frame = compute_indicators(&series, &IndicatorConfig::default());
        let return_stats = ReturnStats::compute(&frame.daily_return);
        let return_histogram = histogram(&frame.daily_return, 10);
        Dashboard {
            ticker: "AAPL".into(),
            tickers: vec!["AAPL".into(), "MSFT".into()],
            start_date: start,
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            frame,
            return_stats,
            return_histogram,
        }
    }

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i % 7) as f64 - (i % 3) as f64).collect()
    }

    #[test]
    fn html_report_adapter_write_creates_file() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("dashboard.html");

        HtmlReportAdapter::new()
            .write(&sample_dashboard(&zigzag(40)), &output_path)
            .unwrap();

        assert!(output_path.exists());
        let contents = fs::read_to_string(&output_path).unwrap();
        assert!(contents.contains("AAPL"));
        assert!(contents.contains("<svg"));
    }

    #[test]
    fn sections_appear_in_order() {
        let html = render_dashboard(&sample_dashboard(&zigzag(40)), false).unwrap();
        let titles = [
            "Stock Price Over the Year",
            "Stock Price with Moving Averages",
            "Histogram of Daily Returns",
            "Cumulative Returns",
            "RSI with Overbought and Oversold Signals",
            "Stock Data",
        ];
        let positions: Vec<usize> = titles
            .iter()
            .map(|t| html.find(t).unwrap_or_else(|| panic!("missing section {t}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches("<svg").count(), 5);
    }

    #[test]
    fn table_lists_every_bar_with_indicator_headers() {
        let html = render_dashboard(&sample_dashboard(&zigzag(25)), false).unwrap();
        assert!(html.contains("<th>MA10</th>"));
        assert!(html.contains("<th>MA20</th>"));
        assert!(html.contains("<th>RSI</th>"));
        assert!(html.contains("2024-01-01"));
        assert!(html.contains("2024-01-25"));
        assert!(html.contains("1024"));
    }

    #[test]
    fn selector_marks_current_ticker() {
        let html = render_dashboard(&sample_dashboard(&zigzag(30)), true).unwrap();
        assert!(html.contains("<option value=\"AAPL\" selected>AAPL</option>"));
        assert!(html.contains("<option value=\"MSFT\">MSFT</option>"));
        assert!(html.contains("<form"));
    }

    #[test]
    fn download_link_encodes_ticker() {
        let mut dashboard = sample_dashboard(&zigzag(30));
        dashboard.ticker = "^GSPC".into();
        let html = render_dashboard(&dashboard, true).unwrap();
        assert!(html.contains("href=\"/table.csv?ticker=%5EGSPC\""));

        assert_eq!(ticker_query("A&B").unwrap(), "ticker=A%26B");
    }

    #[test]
    fn static_page_has_no_form() {
        let html = render_dashboard(&sample_dashboard(&zigzag(30)), false).unwrap();
        assert!(!html.contains("<form"));
    }

    #[test]
    fn short_history_shows_warning() {
        let html = render_dashboard(&sample_dashboard(&[10.0, 11.0, 12.0]), false).unwrap();
        assert!(html.contains("Only 3 trading days"));
        assert!(html.contains("Stock Data"));
    }

    #[test]
    fn error_page_lists_tickers() {
        let html = render_error_page(
            "Data unavailable",
            "no data for ZZZZ",
            &["AAPL".to_string()],
        )
        .unwrap();
        assert!(html.contains("no data for ZZZZ"));
        assert!(html.contains("<option value=\"AAPL\">AAPL</option>"));
    }

    #[test]
    fn html_report_adapter_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("nested/deep/path/dashboard.html");

        HtmlReportAdapter::new()
            .write(&sample_dashboard(&zigzag(5)), &output_path)
            .unwrap();

        assert!(output_path.exists());
    }
}
