//! Trailing simple moving average.
//!
//! MA(w)[i] = mean(values[i-w+1..=i]) for i >= w-1
//! Warmup: first (w-1) values undefined. w = 0 leaves every value undefined.

use crate::domain::indicator::IndicatorColumn;

pub fn moving_average(values: &[f64], window: usize) -> IndicatorColumn {
    let mut column = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return column;
    }

    for (i, slice) in values.windows(window).enumerate() {
        let mean = slice.iter().sum::<f64>() / window as f64;
        column[i + window - 1] = Some(mean);
    }

    column
}
