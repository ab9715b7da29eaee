//! Overbought/oversold classification of RSI values.
//!
//! Both thresholds are exclusive. An undefined RSI falls through both
//! comparisons and is labelled `Neutral`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Overbought,
    Oversold,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Overbought => "Overbought",
            Signal::Oversold => "Oversold",
            Signal::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

pub fn classify(rsi: Option<f64>, thresholds: &SignalThresholds) -> Signal {
    match rsi {
        Some(value) if value > thresholds.overbought => Signal::Overbought,
        Some(value) if value < thresholds.oversold => Signal::Oversold,
        _ => Signal::Neutral,
    }
}

pub fn classify_series(rsi: &[Option<f64>], thresholds: &SignalThresholds) -> Vec<Signal> {
    rsi.iter().map(|value| classify(*value, thresholds)).collect()
}
