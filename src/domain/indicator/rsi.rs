//! RSI (Relative Strength Index).
//!
//! Average gain/loss are trailing simple means over the last n price changes
//! (no Wilder smoothing):
//! - delta[i] = C[i] - C[i-1]
//! - avg_gain[i] = mean(max(delta, 0) over the last n deltas)
//! - avg_loss[i] = mean(max(-delta, 0) over the last n deltas)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! No clamp is applied. avg_loss == 0 with gains gives RS = +inf and RSI
//! resolves to exactly 100; a flat window (0/0) leaves RSI undefined.
//!
//! Warmup: first n bars are undefined (n price changes are needed).

use crate::domain::indicator::moving_average::moving_average;
use crate::domain::indicator::{defined, IndicatorColumn};

pub const DEFAULT_RSI_WINDOW: usize = 14;

#[derive(Debug, Clone)]
pub struct RsiSeries {
    pub avg_gain: IndicatorColumn,
    pub avg_loss: IndicatorColumn,
    pub rsi: IndicatorColumn,
}

pub fn calculate_rsi(closes: &[f64], window: usize) -> RsiSeries {
    if closes.len() < 2 {
        return RsiSeries {
            avg_gain: vec![None; closes.len()],
            avg_loss: vec![None; closes.len()],
            rsi: vec![None; closes.len()],
        };
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    // Delta columns start at bar 1; shift them back onto the bar index.
    let avg_gain: IndicatorColumn = std::iter::once(None)
        .chain(moving_average(&gains, window))
        .collect();
    let avg_loss: IndicatorColumn = std::iter::once(None)
        .chain(moving_average(&losses, window))
        .collect();

    let rsi = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(gain, loss)| {
            let rs = (*gain)? / (*loss)?;
            defined(100.0 - (100.0 / (1.0 + rs)))
        })
        .collect();

    RsiSeries {
        avg_gain,
        avg_loss,
        rsi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn oscillating(count: usize) -> Vec<f64> {
        (1..=count)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect()
    }

    #[test]
    fn rsi_empty() {
        let series = calculate_rsi(&[], 14);
        assert!(series.rsi.is_empty());
        assert!(series.avg_gain.is_empty());
    }

    #[test]
    fn rsi_single_close() {
        let series = calculate_rsi(&[100.0], 14);
        assert_eq!(series.rsi, vec![None]);
    }

    #[test]
    fn rsi_warmup_is_window_length() {
        let closes = oscillating(20);
        let series = calculate_rsi(&closes, 14);

        assert_eq!(series.rsi.len(), 20);
        for i in 0..14 {
            assert!(series.rsi[i].is_none(), "bar {} should be undefined", i);
        }
        for i in 14..20 {
            assert!(series.rsi[i].is_some(), "bar {} should be defined", i);
        }
    }

    #[test]
    fn rsi_shorter_than_window_is_undefined() {
        let closes = oscillating(14);
        let series = calculate_rsi(&closes, 14);
        assert!(series.rsi.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_all_gains_resolves_to_100() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&closes, 14);

        assert_eq!(series.avg_loss[14], Some(0.0));
        assert_relative_eq!(series.avg_gain[14].unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(series.rsi[14], Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&closes, 14);

        assert_eq!(series.avg_gain[14], Some(0.0));
        assert_relative_eq!(series.rsi[14].unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rsi_flat_window_is_undefined() {
        let closes = vec![50.0; 16];
        let series = calculate_rsi(&closes, 14);

        assert_eq!(series.avg_gain[15], Some(0.0));
        assert_eq!(series.avg_loss[15], Some(0.0));
        assert!(series.rsi[15].is_none());
    }

    #[test]
    fn rsi_in_range_where_losses_exist() {
        let closes = oscillating(60);
        let series = calculate_rsi(&closes, 14);

        for (i, value) in series.rsi.iter().enumerate() {
            if let (Some(rsi), Some(loss)) = (value, series.avg_loss[i]) {
                if loss > 0.0 {
                    assert!((0.0..=100.0).contains(rsi), "RSI {} out of range", rsi);
                }
            }
        }
    }

    #[test]
    fn rsi_known_calculation() {
        let closes = [
            44.0, 44.25, 44.50, 43.75, 44.50, 44.25, 44.75, 45.25, 45.50, 45.25, 45.50, 46.0,
            46.25, 46.0, 46.50,
        ];
        let series = calculate_rsi(&closes, 14);

        // gains: .25+.25+.75+.5+.5+.25+.25+.5+.25+.5 = 4.0, losses: .75+.25+.25+.25 = 1.5
        assert_relative_eq!(series.avg_gain[14].unwrap(), 4.0 / 14.0, epsilon = 1e-12);
        assert_relative_eq!(series.avg_loss[14].unwrap(), 1.5 / 14.0, epsilon = 1e-12);
        let expected = 100.0 - 100.0 / (1.0 + 4.0 / 1.5);
        assert_relative_eq!(series.rsi[14].unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn rsi_window_rolls_forward() {
        // 14 gains of 1 followed by one loss of 2: the first gain leaves the window.
        let mut closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        closes.push(112.0);
        let series = calculate_rsi(&closes, 14);

        assert_relative_eq!(series.avg_gain[15].unwrap(), 13.0 / 14.0, epsilon = 1e-12);
        assert_relative_eq!(series.avg_loss[15].unwrap(), 2.0 / 14.0, epsilon = 1e-12);
        let expected = 100.0 - 100.0 / (1.0 + 13.0 / 2.0);
        assert_relative_eq!(series.rsi[15].unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn rsi_zero_window_is_undefined() {
        let series = calculate_rsi(&[100.0, 101.0, 102.0], 0);
        assert!(series.rsi.iter().all(Option::is_none));
    }
}
