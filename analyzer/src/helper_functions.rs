use std::collections::HashSet;
use std::path::PathBuf;

use polars::error::PolarsResult;
use polars::frame::DataFrame;
use polars::prelude::{CsvReadOptions, SerReader};
use plotters::style::RGBColor;

pub fn read_csv(file_path: &str) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(file_path)))?
        .finish()
}

/// Okabe-Ito palette; one colour per model, assigned by appearance order so
/// every figure colours a given model identically.
pub const MODEL_PALETTE: [RGBColor; 8] = [
    RGBColor(0, 114, 178),
    RGBColor(230, 159, 0),
    RGBColor(0, 158, 115),
    RGBColor(213, 94, 0),
    RGBColor(204, 121, 167),
    RGBColor(86, 180, 233),
    RGBColor(240, 228, 66),
    RGBColor(0, 0, 0),
];

pub fn colour_for_model(idx: usize) -> RGBColor {
    MODEL_PALETTE[idx % MODEL_PALETTE.len()]
}

/// Indigo pair used by the strategy-comparison bars: S1 dark, S2 light.
pub const STRATEGY_COLOURS: [RGBColor; 2] = [RGBColor(67, 56, 202), RGBColor(129, 140, 248)];

/// Distinct values of a string column in first-appearance order.
pub fn unique_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}

/// Row-aligned f64 extraction; nulls come back as NaN so positions stay in
/// step with the other columns of the same frame.
pub fn column_f64_nan(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    let ca = df.column(name)?.f64()?;
    Ok((0..ca.len()).map(|i| ca.get(i).unwrap_or(f64::NAN)).collect())
}

pub fn column_str(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let ca = df.column(name)?.str()?;
    Ok((0..ca.len())
        .map(|i| ca.get(i).unwrap_or_default().to_string())
        .collect())
}
