//! Inline SVG charts for the dashboard.
//!
//! Undefined and non-finite points break a line into separate segments
//! instead of being drawn as zero.

use chrono::NaiveDate;

use crate::domain::indicator::signal::SignalThresholds;
use crate::domain::indicator::stats::{normal_pdf, Histogram, ReturnStats};

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

const PLOT_WIDTH: f64 = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
const PLOT_HEIGHT: f64 = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

pub const PRICE_COLOR: &str = "#2563eb";
pub const RSI_COLOR: &str = "#1d4ed8";
const MA_COLORS: [&str; 4] = ["#f59e0b", "#16a34a", "#9333ea", "#dc2626"];

/// Colour for the n-th moving average line.
pub fn ma_color(index: usize) -> &'static str {
    MA_COLORS[index % MA_COLORS.len()]
}

pub struct LineSeries<'a> {
    pub label: String,
    pub color: &'a str,
    pub values: &'a [Option<f64>],
}

struct YAxis {
    min: f64,
    max: f64,
}

impl YAxis {
    fn fit<'a>(values: impl Iterator<Item = &'a Option<f64>>) -> Option<Self> {
        let finite: Vec<f64> = values.flatten().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > min {
            Some(Self { min, max })
        } else {
            // Flat data: pad so the line sits mid-chart.
            let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.05 };
            Some(Self {
                min: min - pad,
                max: max + pad,
            })
        }
    }

    fn scale(&self, v: f64) -> f64 {
        MARGIN_TOP + PLOT_HEIGHT - ((v - self.min) / (self.max - self.min)) * PLOT_HEIGHT
    }
}

fn x_scale(i: usize, len: usize) -> f64 {
    MARGIN_LEFT + (i as f64 / (len.saturating_sub(1)).max(1) as f64) * PLOT_WIDTH
}

fn svg_open(svg: &mut String, axis_title: &str) {
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"15\" text-anchor=\"end\" font-size=\"12\" fill=\"#666\">{}</text>\n",
        CHART_WIDTH, axis_title
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
}

fn y_label(svg: &mut String, y: f64, text: &str) {
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        MARGIN_LEFT - 5.0,
        y,
        text
    ));
}

fn x_label(svg: &mut String, x: f64, text: &str) {
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        x, CHART_HEIGHT, text
    ));
}

fn date_labels(svg: &mut String, dates: &[NaiveDate]) {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return;
    };
    x_label(svg, MARGIN_LEFT, &first.to_string());
    if dates.len() > 2 {
        x_label(svg, MARGIN_LEFT + PLOT_WIDTH / 2.0, &dates[dates.len() / 2].to_string());
    }
    if dates.len() > 1 {
        x_label(svg, CHART_WIDTH - MARGIN_RIGHT, &last.to_string());
    }
}

/// `M`/`L` path data; every undefined point starts a new segment.
fn segmented_path(values: &[Option<f64>], axis: &YAxis) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => {
                let cmd = if pen_down { " L" } else { " M" };
                path.push_str(&format!("{} {:.1} {:.1}", cmd, x_scale(i, values.len()), axis.scale(*v)));
                pen_down = true;
            }
            _ => pen_down = false,
        }
    }
    path.trim_start().to_string()
}

fn legend(svg: &mut String, series: &[LineSeries<'_>]) {
    for (i, s) in series.iter().enumerate() {
        let y = MARGIN_TOP + 12.0 * i as f64;
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            MARGIN_LEFT + 10.0,
            y,
            MARGIN_LEFT + 30.0,
            y,
            s.color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" font-size=\"10\" fill=\"#333\">{}</text>\n",
            MARGIN_LEFT + 35.0,
            y + 3.0,
            s.label
        ));
    }
}

/// Line chart of one or more aligned series. Empty when nothing is plottable.
pub fn line_chart_svg(
    axis_title: &str,
    dates: &[NaiveDate],
    series: &[LineSeries<'_>],
    format_value: fn(f64) -> String,
) -> String {
    let Some(axis) = YAxis::fit(series.iter().flat_map(|s| s.values.iter())) else {
        return String::new();
    };

    let mut svg = String::new();
    svg_open(&mut svg, axis_title);
    y_label(&mut svg, MARGIN_TOP + 5.0, &format_value(axis.max));
    y_label(&mut svg, MARGIN_TOP + PLOT_HEIGHT / 2.0, &format_value((axis.max + axis.min) / 2.0));
    y_label(&mut svg, CHART_HEIGHT - MARGIN_BOTTOM - 5.0, &format_value(axis.min));
    date_labels(&mut svg, dates);

    for s in series {
        let path = segmented_path(s.values, &axis);
        if !path.is_empty() {
            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
                path, s.color
            ));
        }
    }
    if series.len() > 1 {
        legend(&mut svg, series);
    }
    svg.push_str("</svg>");
    svg
}

/// Bars for each bin plus the fitted normal curve, scaled to counts.
pub fn histogram_svg(hist: &Histogram, stats: Option<&ReturnStats>) -> String {
    let max_count = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let bins = hist.counts.len().max(1);
    let bar_width = PLOT_WIDTH / bins as f64;
    let y_scale = |count: f64| MARGIN_TOP + PLOT_HEIGHT - (count / max_count) * PLOT_HEIGHT;

    let mut svg = String::new();
    svg_open(&mut svg, "Frequency");
    y_label(&mut svg, MARGIN_TOP + 5.0, &format!("{}", max_count as usize));
    y_label(&mut svg, CHART_HEIGHT - MARGIN_BOTTOM - 5.0, "0");
    x_label(&mut svg, MARGIN_LEFT, &format_percent(hist.min));
    x_label(&mut svg, CHART_WIDTH - MARGIN_RIGHT, &format_percent(hist.max));

    for (i, &count) in hist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let y = y_scale(count as f64);
        svg.push_str(&format!(
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"rgba(37,99,235,0.7)\" stroke=\"black\" stroke-width=\"0.5\"/>\n",
            MARGIN_LEFT + i as f64 * bar_width,
            y,
            bar_width,
            MARGIN_TOP + PLOT_HEIGHT - y
        ));
    }

    if let Some(ReturnStats {
        mean,
        std_dev: Some(std_dev),
        ..
    }) = stats
    {
        if *std_dev > 0.0 && hist.bin_width > 0.0 {
            let scale = hist.total() as f64 * hist.bin_width;
            let steps = 100;
            let mut path = String::new();
            for step in 0..=steps {
                let x = hist.min + (hist.max - hist.min) * step as f64 / steps as f64;
                let expected = normal_pdf(x, *mean, *std_dev) * scale;
                let px = MARGIN_LEFT + (step as f64 / steps as f64) * PLOT_WIDTH;
                let py = y_scale(expected.min(max_count * 1.2)).max(MARGIN_TOP - 10.0);
                let cmd = if step == 0 { "M" } else { " L" };
                path.push_str(&format!("{} {:.1} {:.1}", cmd, px, py));
            }
            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"black\" stroke-width=\"2\"/>\n",
                path
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

/// RSI on a fixed 0–100 axis with the neutral band between the thresholds shaded.
pub fn rsi_chart_svg(
    dates: &[NaiveDate],
    rsi: &[Option<f64>],
    thresholds: &SignalThresholds,
) -> String {
    let axis = YAxis {
        min: 0.0,
        max: 100.0,
    };

    let mut svg = String::new();
    svg_open(&mut svg, "RSI");
    y_label(&mut svg, axis.scale(100.0) + 5.0, "100");
    y_label(&mut svg, axis.scale(thresholds.overbought) + 3.0, &format!("{}", thresholds.overbought));
    y_label(&mut svg, axis.scale(thresholds.oversold) + 3.0, &format!("{}", thresholds.oversold));
    y_label(&mut svg, axis.scale(0.0) - 5.0, "0");
    date_labels(&mut svg, dates);

    let band_top = axis.scale(thresholds.overbought);
    let band_bottom = axis.scale(thresholds.oversold);
    svg.push_str(&format!(
        "  <rect x=\"{}\" y=\"{:.1}\" width=\"{}\" height=\"{:.1}\" fill=\"rgba(128,128,128,0.3)\"/>\n",
        MARGIN_LEFT,
        band_top,
        PLOT_WIDTH,
        band_bottom - band_top
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{:.1}\" font-size=\"10\" fill=\"red\">Overbought</text>\n",
        MARGIN_LEFT + 10.0,
        axis.scale(80.0)
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{:.1}\" font-size=\"10\" fill=\"green\">Oversold</text>\n",
        MARGIN_LEFT + 10.0,
        axis.scale(20.0)
    ));

    let path = segmented_path(rsi, &axis);
    if !path.is_empty() {
        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
            path, RSI_COLOR
        ));
    }
    svg.push_str("</svg>");
    svg
}

pub fn format_price(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn format_percent(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}
