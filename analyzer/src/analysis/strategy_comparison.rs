//! Mean Truth value per phenomenon, neutrosophic vs. probabilistic scoring,
//! as a grouped bar plot over both strategy blocks.

use std::collections::HashMap;

use plotters::prelude::*;
use plotters_backend::FontTransform;
use polars::prelude::*;
use tracing::info;

use crate::helper_functions::{column_str, unique_in_order, STRATEGY_COLOURS};
use crate::models::{polars_err, STRATEGY_S1, STRATEGY_S2};

const PLOT_WIDTH: u32 = 1400;
const PLOT_HEIGHT: u32 = 800;
const FONT_SIZE_TITLE: u32 = 24;

/// Half-width of one strategy bar inside its phenomenon slot.
const BAR_HALF_WIDTH: f64 = 0.18;

pub fn plot_s1_vs_s2_comparison(df: &DataFrame, output_path: &str) -> PolarsResult<()> {
    let phenomena = unique_in_order(column_str(df, "Phenomenon")?.iter().map(|s| s.as_str()));
    let strategies = [STRATEGY_S1, STRATEGY_S2];

    let grouped = df
        .clone()
        .lazy()
        .group_by([col("Phenomenon"), col("Strategy")])
        .agg([col("Truth").mean().alias("mean_truth")])
        .collect()?;

    let phen_col = grouped.column("Phenomenon")?.str()?;
    let strat_col = grouped.column("Strategy")?.str()?;
    let mean_col = grouped.column("mean_truth")?.f64()?;
    let mut means: HashMap<(String, String), f64> = HashMap::new();
    for row in 0..grouped.height() {
        if let (Some(p), Some(s), Some(m)) =
            (phen_col.get(row), strat_col.get(row), mean_col.get(row))
        {
            means.insert((p.to_string(), s.to_string()), m);
        }
    }

    let y_max = means
        .values()
        .cloned()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let y_hi = if y_max.is_finite() && y_max > 0.0 {
        y_max * 1.1
    } else {
        1.0
    };
    let n_slots = phenomena.len().max(1);

    let root = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| polars_err(Box::new(e)))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Truth Value (T) Comparison: Neutrosophic vs. Probabilistic",
            ("sans-serif", FONT_SIZE_TITLE),
        )
        .margin(20)
        .x_label_area_size(170)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..n_slots as f64 - 0.5, 0.0..y_hi)
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
        .y_desc("Mean Truth Value (T)")
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 15))
        .draw()
        .map_err(|e| polars_err(Box::new(e)))?;

    for (k, &strategy) in strategies.iter().enumerate() {
        let colour = STRATEGY_COLOURS[k];
        let mut first = true;
        for (i, phenomenon) in phenomena.iter().enumerate() {
            let Some(&mean) = means.get(&(phenomenon.clone(), strategy.to_string())) else {
                continue;
            };
            if !mean.is_finite() {
                continue;
            }
            let xc = i as f64 - BAR_HALF_WIDTH + (2.0 * BAR_HALF_WIDTH) * k as f64;
            let anno = chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(xc - BAR_HALF_WIDTH, 0.0), (xc + BAR_HALF_WIDTH, mean)],
                    colour.filled(),
                )))
                .map_err(|e| polars_err(Box::new(e)))?;
            if first {
                first = false;
                anno.label(strategy).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 14, y + 5)], colour.filled())
                });
            }
        }
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
