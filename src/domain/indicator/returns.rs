//! Daily and cumulative return series.
//!
//! DailyReturn[i] = (C[i] - C[i-1]) / C[i-1], undefined at i = 0.
//! CumulativeReturn[i] = prod(1 + DailyReturn[1..=i]) - 1, accumulated in a
//! single pass.
//!
//! A zero previous close is not guarded: x/0 gives +-inf (kept), 0/0 gives
//! NaN (undefined).

use crate::domain::indicator::{defined, IndicatorColumn};

pub fn daily_returns(closes: &[f64]) -> IndicatorColumn {
    let mut column = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return column;
    }

    column.push(None);
    for pair in closes.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        column.push(defined((curr - prev) / prev));
    }
    column
}

/// Undefined daily returns stay undefined and are skipped by the running
/// product.
pub fn cumulative_returns(daily: &[Option<f64>]) -> IndicatorColumn {
    let mut growth = 1.0;
    daily
        .iter()
        .map(|r| {
            let r = (*r)?;
            growth *= 1.0 + r;
            defined(growth - 1.0)
        })
        .collect()
}
