//! Technical indicator calculations.
//!
//! Every calculator takes a plain numeric slice and returns a column aligned
//! 1:1 with its input. Undefined values (warmup periods, `0/0`) are `None`;
//! infinities produced by raw division are kept as `Some`.

pub mod moving_average;
pub mod returns;
pub mod rsi;
pub mod signal;
pub mod stats;

use std::fmt;

/// A derived column aligned with the price series.
pub type IndicatorColumn = Vec<Option<f64>>;

/// Identity of a derived column; `Display` yields the column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    MovingAverage(usize),
    DailyReturn,
    CumulativeReturn,
    Rsi(usize),
    Signal,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::MovingAverage(window) => write!(f, "MA{}", window),
            IndicatorType::DailyReturn => write!(f, "DailyReturn"),
            IndicatorType::CumulativeReturn => write!(f, "CumulativeReturn"),
            IndicatorType::Rsi(_) => write!(f, "RSI"),
            IndicatorType::Signal => write!(f, "Signal"),
        }
    }
}

/// `NaN` is undefined; everything else, including infinities, is a value.
pub(crate) fn defined(value: f64) -> Option<f64> {
    if value.is_nan() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_moving_average() {
        assert_eq!(IndicatorType::MovingAverage(10).to_string(), "MA10");
        assert_eq!(IndicatorType::MovingAverage(20).to_string(), "MA20");
    }

    #[test]
    fn display_other_columns() {
        assert_eq!(IndicatorType::DailyReturn.to_string(), "DailyReturn");
        assert_eq!(IndicatorType::CumulativeReturn.to_string(), "CumulativeReturn");
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI");
        assert_eq!(IndicatorType::Signal.to_string(), "Signal");
    }

    #[test]
    fn defined_keeps_infinity_drops_nan() {
        assert_eq!(defined(1.5), Some(1.5));
        assert_eq!(defined(f64::INFINITY), Some(f64::INFINITY));
        assert_eq!(defined(f64::NAN), None);
    }
}
