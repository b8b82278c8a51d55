//! Violin plot of the per-model component-sum distribution under the
//! neutrosophic framework, quartile lines drawn inside each violin.

use plotters::prelude::*;
use polars::prelude::*;
use tracing::info;

use crate::analysis::stats::{expand_range, gaussian_kde, quartiles, silverman_bandwidth};
use crate::data_handling::neutrosophic_results::filter_strategy;
use crate::helper_functions::{colour_for_model, column_f64_nan, column_str, unique_in_order};
use crate::models::{polars_err, STRATEGY_S1};

const PLOT_WIDTH: u32 = 1200;
const PLOT_HEIGHT: u32 = 800;
const FONT_SIZE_TITLE: u32 = 24;

/// Half-width a violin reaches at its densest point, in slot units.
const VIOLIN_HALF_WIDTH: f64 = 0.35;
const KDE_GRID: usize = 64;

pub fn plot_model_performance(df: &DataFrame, output_path: &str) -> PolarsResult<()> {
    let df_s1 = filter_strategy(df, STRATEGY_S1)?;
    let model_col = column_str(&df_s1, "Model")?;
    let sums = column_f64_nan(&df_s1, "Sum")?;
    let models = unique_in_order(model_col.iter().map(|s| s.as_str()));

    // Finite sums per model, in model appearance order.
    let samples: Vec<Vec<f64>> = models
        .iter()
        .map(|m| {
            model_col
                .iter()
                .zip(sums.iter())
                .filter(|(name, v)| name.as_str() == m.as_str() && v.is_finite())
                .map(|(_, &v)| v)
                .collect()
        })
        .collect();

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for values in &samples {
        for &v in values {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    let (y_lo, y_hi) = expand_range(y_min, y_max, 0.10);
    let n_slots = models.len().max(1);

    let root = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| polars_err(Box::new(e)))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Component Sum Distribution per Model (Neutrosophic Framework)",
            ("sans-serif", FONT_SIZE_TITLE),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..n_slots as f64 - 0.5, y_lo..y_hi)
        .map_err(|e| polars_err(Box::new(e)))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n_slots)
        .x_label_formatter(&|val: &f64| {
            let idx = val.round() as isize;
            if idx >= 0 && (idx as usize) < models.len() {
                models[idx as usize].clone()
            } else {
                String::new()
            }
        })
        .x_desc("Model")
        .y_desc("Component Sum (T+I+F)")
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 15))
        .draw()
        .map_err(|e| polars_err(Box::new(e)))?;

    for (j, values) in samples.iter().enumerate() {
        if values.is_empty() {
            continue;
        }
        let xc = j as f64;
        let colour = colour_for_model(j);

        if values.len() == 1 {
            // A single observation has no spread to estimate; mark it.
            chart
                .draw_series(std::iter::once(Circle::new(
                    (xc, values[0]),
                    4,
                    colour.filled(),
                )))
                .map_err(|e| polars_err(Box::new(e)))?;
            continue;
        }

        let bandwidth = silverman_bandwidth(values);
        let data_lo = values.iter().cloned().fold(f64::INFINITY, f64::min) - 2.0 * bandwidth;
        let data_hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + 2.0 * bandwidth;
        let step = (data_hi - data_lo) / (KDE_GRID - 1) as f64;
        let grid: Vec<f64> = (0..KDE_GRID).map(|k| data_lo + k as f64 * step).collect();
        let density = gaussian_kde(values, bandwidth, &grid);
        let peak = density.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let scale = if peak > 0.0 { VIOLIN_HALF_WIDTH / peak } else { 0.0 };

        // Closed outline: right flank bottom-to-top, left flank back down.
        let mut outline: Vec<(f64, f64)> = grid
            .iter()
            .zip(density.iter())
            .map(|(&y, &d)| (xc + d * scale, y))
            .collect();
        outline.extend(
            grid.iter()
                .zip(density.iter())
                .rev()
                .map(|(&y, &d)| (xc - d * scale, y)),
        );

        chart
            .draw_series(std::iter::once(Polygon::new(
                outline.clone(),
                colour.mix(0.6).filled(),
            )))
            .map_err(|e| polars_err(Box::new(e)))?;
        outline.push(outline[0]);
        chart
            .draw_series(std::iter::once(PathElement::new(
                outline,
                colour.stroke_width(1),
            )))
            .map_err(|e| polars_err(Box::new(e)))?;

        // Quartile lines, clipped to the violin's width at that height.
        let (q1, median, q3) = quartiles(values);
        for (q, weight) in [(q1, 1u32), (median, 2u32), (q3, 1u32)] {
            let nearest = ((q - data_lo) / step).round().clamp(0.0, (KDE_GRID - 1) as f64);
            let w = density[nearest as usize] * scale * 0.9;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(xc - w, q), (xc + w, q)],
                    BLACK.stroke_width(weight),
                )))
                .map_err(|e| polars_err(Box::new(e)))?;
        }
    }

    root.present().map_err(|e| polars_err(Box::new(e)))?;
    info!("Saved plot to {}", output_path);
    Ok(())
}
