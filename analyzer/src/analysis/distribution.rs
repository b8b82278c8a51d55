//! Grouped box plots of the neutrosophic (S1) scores: one box per model
//! inside each phenomenon slot.

use std::collections::HashMap;

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters_backend::FontTransform;
use polars::prelude::*;
use tracing::info;

use crate::data_handling::neutrosophic_results::filter_strategy;
use crate::helper_functions::{colour_for_model, column_f64_nan, column_str, unique_in_order};
use crate::models::{polars_err, STRATEGY_S1};
use crate::analysis::stats::{box_stats, expand_range, BoxStats};

const PLOT_WIDTH: u32 = 1400;
const PLOT_HEIGHT: u32 = 800;
const PLOT_MARGIN: i32 = 20;
const FONT_SIZE_TITLE: u32 = 24;

/// Fraction of each phenomenon slot occupied by its group of boxes.
const GROUP_WIDTH: f64 = 0.8;

/// Centre of the j-th model box inside the i-th phenomenon slot.
fn slot_centre(i: usize, j: usize, n_models: usize) -> f64 {
    let sub = GROUP_WIDTH / n_models as f64;
    i as f64 - GROUP_WIDTH / 2.0 + (j as f64 + 0.5) * sub
}

/// Distribution of the Truth component under the neutrosophic framework.
pub fn plot_components_distribution(df: &DataFrame, output_path: &str) -> PolarsResult<()> {
    let df_s1 = filter_strategy(df, STRATEGY_S1)?;
    grouped_boxplot(
        &df_s1,
        "Truth",
        "Truth Component (T) Distribution under the Neutrosophic Framework (S1)",
        "Truth Value (T)",
        None,
        output_path,
    )
}

/// Component sums per phenomenon and model, with the probabilistic Sum = 1
/// boundary marked. Sums above the line are the hyper-truth regime.
pub fn plot_hypertruth_sum(df: &DataFrame, output_path: &str) -> PolarsResult<()> {
    let df_s1 = filter_strategy(df, STRATEGY_S1)?;
    grouped_boxplot(
        &df_s1,
        "Sum",
        "Component Sum (T+I+F) under the Neutrosophic Framework (S1)",
        "Component Sum",
        Some(1.0),
        output_path,
    )
}

fn grouped_boxplot(
    df: &DataFrame,
    value_col: &str,
    caption: &str,
    y_desc: &str,
    refline: Option<f64>,
    output_path: &str,
) -> PolarsResult<()> {
    let phenomena_col = column_str(df, "Phenomenon")?;
    let model_col = column_str(df, "Model")?;
    let values = column_f64_nan(df, value_col)?;

    let phenomena = unique_in_order(phenomena_col.iter().map(|s| s.as_str()));
    let models = unique_in_order(model_col.iter().map(|s| s.as_str()));
    let n_models = models.len().max(1);
    let n_slots = phenomena.len().max(1);

    // Bucket the sample per (phenomenon, model) cell, dropping NaNs.
    let phen_idx: HashMap<&str, usize> = phenomena
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();
    let model_idx: HashMap<&str, usize> = models
        .iter()
        .enumerate()
        .map(|(j, m)| (m.as_str(), j))
        .collect();
    let mut groups: HashMap<(usize, usize), Vec<f64>> = HashMap::new();
    let mut skipped = 0usize;
    for row in 0..values.len() {
        if !values[row].is_finite() {
            skipped += 1;
            continue;
        }
        let i = phen_idx[phenomena_col[row].as_str()];
        let j = model_idx[model_col[row].as_str()];
        groups.entry((i, j)).or_default().push(values[row]);
    }
    if skipped > 0 {
        log::warn!("Skipped {skipped} rows with missing '{value_col}' values");
    }

    let cells: Vec<((usize, usize), BoxStats)> = {
        let mut keys: Vec<&(usize, usize)> = groups.keys().collect();
        keys.sort();
        keys.iter()
            .map(|&&key| (key, box_stats(&groups[&key])))
            .collect()
    };

    // Y range over whiskers and fliers.
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, stats) in &cells {
        y_min = y_min.min(stats.lo_whisker);
        y_max = y_max.max(stats.hi_whisker);
        for &v in &stats.outliers {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    let (mut y_lo, mut y_hi) = expand_range(y_min, y_max, 0.05);
    if let Some(y_ref) = refline {
        y_lo = y_lo.min(y_ref - 0.05);
        y_hi = y_hi.max(y_ref + 0.05);
    }
    let (x_lo, x_hi) = (-0.5, n_slots as f64 - 0.5);

    let root = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| polars_err(Box::new(e)))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", FONT_SIZE_TITLE))
        .margin(PLOT_MARGIN)
        .x_label_area_size(170)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| polars_err(Box::new(e)))?;

    let x_label_style = TextStyle::from(("sans-serif", 15)).transform(FontTransform::Rotate270);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n_slots)
        .x_label_style(x_label_style)
        .x_label_formatter(&|val: &f64| {
            let idx = val.round() as isize;
            if idx >= 0 && (idx as usize) < phenomena.len() {
                phenomena[idx as usize].clone()
            } else {
                String::new()
            }
        })
        .x_desc("Linguistic Phenomenon")
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 15))
        .draw()
        .map_err(|e| polars_err(Box::new(e)))?;

    // One box per populated cell. The first box of each model carries the
    // legend entry.
    let half_width = GROUP_WIDTH / n_models as f64 * 0.4;
    let mut labelled = vec![false; models.len()];
    for ((i, j), stats) in &cells {
        let xc = slot_centre(*i, *j, n_models);
        let colour = colour_for_model(*j);

        let anno = chart
            .draw_series(std::iter::once(Rectangle::new(
                [(xc - half_width, stats.q1), (xc + half_width, stats.q3)],
                colour.mix(0.7).filled(),
            )))
            .map_err(|e| polars_err(Box::new(e)))?;
        if !labelled[*j] {
            labelled[*j] = true;
            let legend_colour = colour;
            anno.label(models[*j].clone()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 14, y + 5)], legend_colour.filled())
            });
        }

        // Box border, median, whiskers and caps.
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(xc - half_width, stats.q1), (xc + half_width, stats.q3)],
                BLACK.stroke_width(1),
            )))
            .map_err(|e| polars_err(Box::new(e)))?;
        let strokes = [
            vec![(xc - half_width, stats.median), (xc + half_width, stats.median)],
            vec![(xc, stats.q3), (xc, stats.hi_whisker)],
            vec![(xc, stats.q1), (xc, stats.lo_whisker)],
            vec![
                (xc - half_width / 2.0, stats.hi_whisker),
                (xc + half_width / 2.0, stats.hi_whisker),
            ],
            vec![
                (xc - half_width / 2.0, stats.lo_whisker),
                (xc + half_width / 2.0, stats.lo_whisker),
            ],
        ];
        for points in strokes {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    points,
                    BLACK.stroke_width(1),
                )))
                .map_err(|e| polars_err(Box::new(e)))?;
        }
        for &v in &stats.outliers {
            chart
                .draw_series(std::iter::once(Circle::new(
                    (xc, v),
                    3,
                    BLACK.mix(0.4).filled(),
                )))
                .map_err(|e| polars_err(Box::new(e)))?;
        }
    }

    if let Some(y_ref) = refline {
        draw_dashed_hline(&mut chart, y_ref, x_lo, x_hi)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 15))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(|e| polars_err(Box::new(e)))?;

    root.present().map_err(|e| polars_err(Box::new(e)))?;
    info!("Saved plot to {}", output_path);
    Ok(())
}

/// Simulated dashed horizontal line (plus legend entry) at `y_ref`.
fn draw_dashed_hline<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    y_ref: f64,
    x_lo: f64,
    x_hi: f64,
) -> PolarsResult<()>
where
    DB::ErrorType: 'static,
{
    let dash = (x_hi - x_lo) / 80.0;
    let mut x = x_lo;
    let mut first = true;
    while x < x_hi {
        let x_end = (x + dash).min(x_hi);
        let anno = chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, y_ref), (x_end, y_ref)],
                RED.stroke_width(2),
            )))
            .map_err(|e| polars_err(Box::new(e)))?;
        if first {
            first = false;
            anno.label("Probabilistic limit (Sum = 1)").legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2))
            });
        }
        x += dash * 2.0;
    }
    Ok(())
}
