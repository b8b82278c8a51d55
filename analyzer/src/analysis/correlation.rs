//! Pairwise Pearson correlation of the neutrosophic components, rendered as
//! an annotated heatmap. Pairs are formed over rows where both columns are
//! finite, so a stray missing value drops only the pairs it touches.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::*;
use tracing::info;

use crate::analysis::stats::pearson;
use crate::data_handling::neutrosophic_results::filter_strategy;
use crate::helper_functions::column_f64_nan;
use crate::models::{polars_err, COMPONENT_COLS, STRATEGY_S1};

const PLOT_WIDTH: u32 = 1000;
const PLOT_HEIGHT: u32 = 800;
const FONT_SIZE_TITLE: u32 = 24;

pub fn plot_correlation_heatmap(df: &DataFrame, output_path: &str) -> PolarsResult<()> {
    let df_s1 = filter_strategy(df, STRATEGY_S1)?;
    let columns: Vec<Vec<f64>> = COMPONENT_COLS
        .iter()
        .map(|name| column_f64_nan(&df_s1, name))
        .collect::<PolarsResult<_>>()?;

    let n = COMPONENT_COLS.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    for r in 0..n {
        for c in 0..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = columns[r]
                .iter()
                .zip(columns[c].iter())
                .filter(|(a, b)| a.is_finite() && b.is_finite())
                .map(|(&a, &b)| (a, b))
                .unzip();
            matrix[r][c] = pearson(&xs, &ys);
        }
    }

    let root = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| polars_err(Box::new(e)))?;

    let span = n as f64 - 0.5;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Correlation Matrix of Neutrosophic Components (S1)",
            ("sans-serif", FONT_SIZE_TITLE),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(130)
        .build_cartesian_2d(-0.5..span, -0.5..span)
        .map_err(|e| polars_err(Box::new(e)))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&|val: &f64| {
            let idx = val.round() as isize;
            if idx >= 0 && (idx as usize) < n {
                COMPONENT_COLS[idx as usize].to_string()
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|val: &f64| {
            // Row 0 sits at the top of the matrix.
            let idx = val.round() as isize;
            if idx >= 0 && (idx as usize) < n {
                COMPONENT_COLS[n - 1 - idx as usize].to_string()
            } else {
                String::new()
            }
        })
        .label_style(("sans-serif", 16))
        .draw()
        .map_err(|e| polars_err(Box::new(e)))?;

    for r in 0..n {
        for c in 0..n {
            let value = matrix[r][c];
            let yc = (n - 1 - r) as f64;
            let xc = c as f64;
            let fill = diverging_colour(value);

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(xc - 0.5, yc - 0.5), (xc + 0.5, yc + 0.5)],
                    fill.filled(),
                )))
                .map_err(|e| polars_err(Box::new(e)))?;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(xc - 0.5, yc - 0.5), (xc + 0.5, yc + 0.5)],
                    WHITE.stroke_width(2),
                )))
                .map_err(|e| polars_err(Box::new(e)))?;

            let text = if value.is_finite() {
                format!("{value:.2}")
            } else {
                "n/a".to_string()
            };
            let text_colour = if value.is_finite() && value.abs() > 0.5 {
                WHITE
            } else {
                BLACK
            };
            let style = ("sans-serif", 20)
                .into_font()
                .color(&text_colour)
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart
                .draw_series(std::iter::once(Text::new(text, (xc, yc), style)))
                .map_err(|e| polars_err(Box::new(e)))?;
        }
    }

    root.present().map_err(|e| polars_err(Box::new(e)))?;
    info!("Saved plot to {}", output_path);
    Ok(())
}

/// Blue-white-red diverging map over [-1, 1]; NaN renders grey.
fn diverging_colour(value: f64) -> RGBColor {
    if !value.is_finite() {
        return RGBColor(205, 205, 205);
    }
    let v = value.clamp(-1.0, 1.0);
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    let (low, high, t) = if v < 0.0 {
        ((59, 76, 192), (242, 242, 242), v + 1.0)
    } else {
        ((242, 242, 242), (180, 4, 38), v)
    };
    RGBColor(
        lerp(low.0, high.0, t),
        lerp(low.1, high.1, t),
        lerp(low.2, high.2, t),
    )
}
