//! Summary statistics for the daily return distribution.
//!
//! Only finite values take part; undefined and infinite returns are skipped.

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). `None` with fewer than two values.
    pub std_dev: Option<f64>,
}

impl ReturnStats {
    pub fn compute(values: &[Option<f64>]) -> Option<Self> {
        let finite: Vec<f64> = finite_values(values);
        if finite.is_empty() {
            return None;
        }

        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (count - 1) as f64;
            Some(variance.sqrt())
        } else {
            None
        };

        Some(Self {
            count,
            mean,
            std_dev,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Lower edge of bin `i`.
    pub fn bin_start(&self, i: usize) -> f64 {
        self.min + i as f64 * self.bin_width
    }
}

/// Equal-width bins spanning [min, max]; the maximum lands in the last bin.
/// A zero-width range collapses every value into the first bin.
pub fn histogram(values: &[Option<f64>], bins: usize) -> Option<Histogram> {
    let finite = finite_values(values);
    if finite.is_empty() || bins == 0 {
        return None;
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let bin_width = if range > 0.0 { range / bins as f64 } else { 0.0 };

    let mut counts = vec![0usize; bins];
    for value in finite {
        let idx = if bin_width > 0.0 {
            (((value - min) / bin_width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    Some(Histogram {
        min,
        max,
        bin_width,
        counts,
    })
}

pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * PI).sqrt())
}

fn finite_values(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().filter(|v| v.is_finite()).collect()
}
