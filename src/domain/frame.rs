//! The indicator frame: a price series plus every derived column.
//!
//! [`compute_indicators`] is a pure function. Each call builds a new frame
//! from the series it is given; nothing is cached between calls.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::indicator::moving_average::moving_average;
use crate::domain::indicator::returns::{cumulative_returns, daily_returns};
use crate::domain::indicator::rsi::{calculate_rsi, DEFAULT_RSI_WINDOW};
use crate::domain::indicator::signal::{classify_series, Signal, SignalThresholds};
use crate::domain::indicator::{IndicatorColumn, IndicatorType};
use crate::domain::ohlcv::{PriceBar, PriceSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub ma_windows: Vec<usize>,
    pub rsi_window: usize,
    pub thresholds: SignalThresholds,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_windows: vec![10, 20],
            rsi_window: DEFAULT_RSI_WINDOW,
            thresholds: SignalThresholds::default(),
        }
    }
}

impl IndicatorConfig {
    /// Bars needed before every configured column has at least one value.
    pub fn required_history(&self) -> usize {
        let longest_ma = self.ma_windows.iter().copied().max().unwrap_or(0);
        longest_ma.max(self.rsi_window + 1)
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub series: PriceSeries,
    pub moving_averages: BTreeMap<usize, IndicatorColumn>,
    pub daily_return: IndicatorColumn,
    pub cumulative_return: IndicatorColumn,
    pub avg_gain: IndicatorColumn,
    pub avg_loss: IndicatorColumn,
    pub rsi: IndicatorColumn,
    pub signal: Vec<Signal>,
    pub config: IndicatorConfig,
}

/// One row of the frame, borrowed for table rendering.
#[derive(Debug, Clone)]
pub struct FrameRow<'a> {
    pub bar: &'a PriceBar,
    pub moving_averages: Vec<(usize, Option<f64>)>,
    pub daily_return: Option<f64>,
    pub cumulative_return: Option<f64>,
    pub rsi: Option<f64>,
    pub signal: Signal,
}

pub fn compute_indicators(series: &PriceSeries, config: &IndicatorConfig) -> IndicatorFrame {
    let closes = series.closes();

    let moving_averages = config
        .ma_windows
        .iter()
        .map(|&window| (window, moving_average(&closes, window)))
        .collect();

    let daily_return = daily_returns(&closes);
    let cumulative_return = cumulative_returns(&daily_return);
    let rsi = calculate_rsi(&closes, config.rsi_window);
    let signal = classify_series(&rsi.rsi, &config.thresholds);

    IndicatorFrame {
        series: series.clone(),
        moving_averages,
        daily_return,
        cumulative_return,
        avg_gain: rsi.avg_gain,
        avg_loss: rsi.avg_loss,
        rsi: rsi.rsi,
        signal,
        config: config.clone(),
    }
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn ticker(&self) -> &str {
        self.series.ticker()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.series.dates()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.series.closes()
    }

    pub fn moving_average(&self, window: usize) -> Option<&IndicatorColumn> {
        self.moving_averages.get(&window)
    }

    /// Column lookup by identity; `Signal` is not numeric and yields `None`.
    pub fn column(&self, indicator: IndicatorType) -> Option<&IndicatorColumn> {
        match indicator {
            IndicatorType::MovingAverage(window) => self.moving_average(window),
            IndicatorType::DailyReturn => Some(&self.daily_return),
            IndicatorType::CumulativeReturn => Some(&self.cumulative_return),
            IndicatorType::Rsi(window) if window == self.config.rsi_window => Some(&self.rsi),
            IndicatorType::Rsi(_) | IndicatorType::Signal => None,
        }
    }

    /// Column headers in table order, after the OHLCV columns.
    pub fn indicator_columns(&self) -> Vec<IndicatorType> {
        let mut columns: Vec<IndicatorType> = self
            .moving_averages
            .keys()
            .map(|&w| IndicatorType::MovingAverage(w))
            .collect();
        columns.push(IndicatorType::DailyReturn);
        columns.push(IndicatorType::CumulativeReturn);
        columns.push(IndicatorType::Rsi(self.config.rsi_window));
        columns.push(IndicatorType::Signal);
        columns
    }

    pub fn has_insufficient_history(&self) -> bool {
        self.len() < self.config.required_history()
    }

    pub fn rows(&self) -> impl Iterator<Item = FrameRow<'_>> + '_ {
        self.series.bars().iter().enumerate().map(move |(i, bar)| FrameRow {
            bar,
            moving_averages: self
                .moving_averages
                .iter()
                .map(|(&w, column)| (w, column[i]))
                .collect(),
            daily_return: self.daily_return[i],
            cumulative_return: self.cumulative_return[i],
            rsi: self.rsi[i],
            signal: self.signal[i],
        })
    }
}
