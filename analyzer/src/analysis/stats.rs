//! Hand-rolled descriptive statistics backing the figures: quantile
//! interpolation, box-plot stats, Pearson correlation, and a Gaussian KDE
//! for the violin outlines.

use polars::prelude::*;
use tracing::info;

use crate::helper_functions::column_f64_nan;
use crate::models::{COMPONENT_COLS, STRATEGY_S1, STRATEGY_S2};

/// (min, max, mean) of a sample.
pub fn basic_stats(values: &[f64]) -> (f64, f64, f64) {
    let min_v = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_v = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (min_v, max_v, mean)
}

/// Linearly-interpolated quantile over a pre-sorted slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = (n as f64 - 1.0) * p;
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;
    if idx + 1 < n {
        sorted[idx] * (1.0 - frac) + sorted[idx + 1] * frac
    } else {
        sorted[idx]
    }
}

/// (q1, median, q3) with linear interpolation.
pub fn quartiles(values: &[f64]) -> (f64, f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    (
        quantile_sorted(&sorted, 0.25),
        quantile_sorted(&sorted, 0.50),
        quantile_sorted(&sorted, 0.75),
    )
}

/// Box-plot geometry for one group: quartile box, 1.5*IQR whiskers clamped
/// to observed values, and the fliers beyond them.
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lo_whisker: f64,
    pub hi_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(values: &[f64]) -> BoxStats {
    let (q1, median, q3) = quartiles(values);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let lo_whisker = values
        .iter()
        .cloned()
        .filter(|v| *v >= lo_fence)
        .fold(f64::INFINITY, f64::min);
    let hi_whisker = values
        .iter()
        .cloned()
        .filter(|v| *v <= hi_fence)
        .fold(f64::NEG_INFINITY, f64::max);
    let outliers = values
        .iter()
        .cloned()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    BoxStats {
        q1,
        median,
        q3,
        lo_whisker,
        hi_whisker,
        outliers,
    }
}

/// Pearson correlation coefficient. NaN inputs or a zero-variance sample
/// yield NaN, which the heatmap renders as a blank cell.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    if xs.len() != ys.len() || xs.is_empty() {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Silverman's rule-of-thumb bandwidth, floored so an all-equal sample still
/// produces a drawable kernel.
pub fn silverman_bandwidth(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std = var.sqrt();
    let (q1, _, q3) = quartiles(values);
    let iqr = q3 - q1;

    let spread = if iqr > 0.0 { std.min(iqr / 1.34) } else { std };
    let h = 0.9 * spread * n.powf(-0.2);
    if h > 0.0 {
        h
    } else {
        1e-3
    }
}

/// Gaussian kernel density estimate of `values` evaluated at `grid`.
pub fn gaussian_kde(values: &[f64], bandwidth: f64, grid: &[f64]) -> Vec<f64> {
    let norm = values.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt();
    grid.iter()
        .map(|&x| {
            values
                .iter()
                .map(|&v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                / norm
        })
        .collect()
}

/// Pad a value range by `pct` on each side so marks stay off the border.
pub fn expand_range(min_val: f64, max_val: f64, pct: f64) -> (f64, f64) {
    if !min_val.is_finite() || !max_val.is_finite() || (max_val - min_val).abs() < 1e-9 {
        let centre = if min_val.is_finite() { min_val } else { 0.5 };
        return (centre - 0.5, centre + 0.5);
    }
    let pad = (max_val - min_val) * pct;
    (min_val - pad, max_val + pad)
}

/// Log min/max/mean of every component, per strategy.
pub fn log_component_summary(df: &DataFrame) -> PolarsResult<()> {
    for label in [STRATEGY_S1, STRATEGY_S2] {
        let block = crate::data_handling::neutrosophic_results::filter_strategy(df, label)?;
        for &name in &COMPONENT_COLS {
            let values: Vec<f64> = column_f64_nan(&block, name)?
                .into_iter()
                .filter(|v| v.is_finite())
                .collect();
            if values.is_empty() {
                info!("{label}: {name} has no finite values");
                continue;
            }
            let (min_v, max_v, mean) = basic_stats(&values);
            info!(
                "{label}: {name} n={} min={min_v:.3} max={max_v:.3} mean={mean:.3}",
                values.len()
            );
        }
    }
    Ok(())
}
