//! Truth-against-Falsity scatter for the ethical-contradiction phenomenon,
//! point size carrying the indeterminacy component.

use plotters::prelude::*;
use polars::prelude::*;
use tracing::info;

use crate::analysis::stats::expand_range;
use crate::helper_functions::{colour_for_model, column_str, unique_in_order};
use crate::models::{polars_err, ETHICAL_CONTRADICTION, STRATEGY_S1};

const PLOT_WIDTH: u32 = 1200;
const PLOT_HEIGHT: u32 = 800;
const FONT_SIZE_TITLE: u32 = 24;

const MIN_RADIUS: f64 = 6.0;
const MAX_RADIUS: f64 = 26.0;

pub fn plot_ethical_contradiction(df: &DataFrame, output_path: &str) -> PolarsResult<()> {
    // Colour by model position in the full table so every figure colours a
    // given model the same way, whether or not it scored this phenomenon.
    let models = unique_in_order(column_str(df, "Model")?.iter().map(|s| s.as_str()));

    let df_ethical = df
        .clone()
        .lazy()
        .filter(
            col("Phenomenon")
                .eq(lit(ETHICAL_CONTRADICTION))
                .and(col("Strategy").eq(lit(STRATEGY_S1))),
        )
        .collect()?;

    let model_col = df_ethical.column("Model")?.str()?;
    let truth_col = df_ethical.column("Truth")?.f64()?;
    let falsity_col = df_ethical.column("Falsity")?.f64()?;
    let indet_col = df_ethical.column("Indeterminacy")?.f64()?;

    let mut rows = Vec::with_capacity(df_ethical.height());
    let mut skipped = 0usize;
    for i in 0..df_ethical.height() {
        match (
            model_col.get(i),
            truth_col.get(i),
            falsity_col.get(i),
            indet_col.get(i),
        ) {
            (Some(model), Some(truth), Some(falsity), Some(indet)) => {
                rows.push((model.to_string(), truth, falsity, indet));
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        log::warn!("Skipped {skipped} ethical-contradiction rows with missing values");
    }

    let (x_min, x_max) = rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.1), hi.max(r.1))
        });
    let (y_min, y_max) = rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.2), hi.max(r.2))
        });
    let (x_lo, x_hi) = expand_range(x_min, x_max, 0.10);
    let (y_lo, y_hi) = expand_range(y_min, y_max, 0.10);

    // Indeterminacy range drives the point radius.
    let (ind_lo, ind_hi) = rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.3), hi.max(r.3))
        });
    let radius_for = |indet: f64| -> i32 {
        if !(ind_hi - ind_lo).is_finite() || (ind_hi - ind_lo) < 1e-12 {
            return ((MIN_RADIUS + MAX_RADIUS) / 2.0) as i32;
        }
        let t = (indet - ind_lo) / (ind_hi - ind_lo);
        (MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)).round() as i32
    };

    let root = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| polars_err(Box::new(e)))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Ethical Contradiction Analysis (Neutrosophic Framework)",
            ("sans-serif", FONT_SIZE_TITLE),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| polars_err(Box::new(e)))?;

    chart
        .configure_mesh()
        .x_desc("Truth Value (T)")
        .y_desc("Falsity Value (F)")
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 15))
        .draw()
        .map_err(|e| polars_err(Box::new(e)))?;

    // One series per model so the legend picks up name and colour together.
    for (j, model) in models.iter().enumerate() {
        let colour = colour_for_model(j);
        let points: Vec<&(String, f64, f64, f64)> =
            rows.iter().filter(|r| &r.0 == model).collect();
        if points.is_empty() {
            continue;
        }
        chart
            .draw_series(
                points
                    .iter()
                    .map(|r| Circle::new((r.1, r.2), radius_for(r.3), colour.mix(0.7).filled())),
            )
            .map_err(|e| polars_err(Box::new(e)))?
            .label(model.clone())
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, colour.filled()));
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
