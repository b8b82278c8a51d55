//! Loader and wide-to-long reshaper for the neutrosophic scoring CSV.
//!
//! The source table carries one row per (phenomenon, model) pair with score
//! columns for both strategies side by side. Downstream figures want one row
//! per (phenomenon, model, strategy), so the loader splits the frame into a
//! strategy block each and stacks them.

use polars::prelude::*;
use tracing::info;

use crate::helper_functions::read_csv;
use crate::models::{COMPONENT_COLS, STRATEGY_S1, STRATEGY_S2};

/// Wide-format results CSV produced by the evaluation runs.
pub struct NeutrosophicResults {
    pub path: String,
}

impl NeutrosophicResults {
    pub fn load(&self) -> PolarsResult<DataFrame> {
        read_csv(&self.path)
    }

    pub fn load_reshaped(&self) -> PolarsResult<DataFrame> {
        reshape(self.load()?)
    }
}

/// Reshape the wide table into long form: an S1 block (Sum taken verbatim
/// from the source) stacked over an S2 block (Sum computed as T+I+F), both
/// in original row order.
pub fn reshape(mut df: DataFrame) -> PolarsResult<DataFrame> {
    // Strip stray whitespace from header names before any lookup.
    let trimmed: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .filter(|c| c.as_str() != c.as_str().trim())
        .map(|c| (c.to_string(), c.as_str().trim().to_string()))
        .collect();
    for (old, new) in &trimmed {
        df.rename(old, new.as_str().into())?;
    }

    // Header variants written by older evaluation runs.
    let rename_map = [
        ("Phenomenon_Type", "Phenomenon"),
        ("S1_Sum_TIF", "S1_Sum"),
    ];
    for &(old, new) in &rename_map {
        if df.get_column_names().iter().any(|c| c.as_str() == old) {
            df.rename(old, new.into())?;
        }
    }

    let height = df.height();

    // S1 block. The source sum is kept as-is: strategy S1 permits T+I+F != 1,
    // so it must not be recomputed from the components.
    let mut s1 = df.select([
        "Phenomenon",
        "Model",
        "S1_Truth_T",
        "S1_Indet_I",
        "S1_Falsity_F",
        "S1_Sum",
    ])?;
    let s1_renames = [
        ("S1_Truth_T", "Truth"),
        ("S1_Indet_I", "Indeterminacy"),
        ("S1_Falsity_F", "Falsity"),
        ("S1_Sum", "Sum"),
    ];
    for &(old, new) in &s1_renames {
        s1.rename(old, new.into())?;
    }

    // S2 block. The probabilistic strategy reports no total, so compute one.
    let mut s2 = df.select([
        "Phenomenon",
        "Model",
        "S2_Truth_T",
        "S2_Indet_I",
        "S2_Falsity_F",
    ])?;
    let s2_renames = [
        ("S2_Truth_T", "Truth"),
        ("S2_Indet_I", "Indeterminacy"),
        ("S2_Falsity_F", "Falsity"),
    ];
    for &(old, new) in &s2_renames {
        s2.rename(old, new.into())?;
    }
    // `DataFrame::rename` populates (and leaves stale) the internal schema
    // cache via its duplicate-name check, so the post-rename column names are
    // not visible to `.lazy()` until the cache is dropped.
    s2.clear_schema();
    let mut s2 = s2
        .lazy()
        .with_column((col("Truth") + col("Indeterminacy") + col("Falsity")).alias("Sum"))
        .collect()?;

    for frame in [&mut s1, &mut s2] {
        for &name in &COMPONENT_COLS {
            let cast = frame.column(name)?.cast(&DataType::Float64)?;
            frame.with_column(cast)?;
        }
    }

    s1.with_column(Series::new(
        PlSmallStr::from("Strategy"),
        vec![STRATEGY_S1; height],
    ))?;
    s2.with_column(Series::new(
        PlSmallStr::from("Strategy"),
        vec![STRATEGY_S2; height],
    ))?;

    let long = s1.vstack(&s2)?;
    info!("Reshaped {} wide rows into {} long rows", height, long.height());
    Ok(long)
}

/// Long-table view restricted to one strategy, rows kept in table order.
pub fn filter_strategy(df: &DataFrame, label: &str) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(col("Strategy").eq(lit(label)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn wide_fixture() -> DataFrame {
        df![
            "Phenomenon_Type" => ["Ambiguity", "Ambiguity", "Vagueness"],
            "Model" => ["gpt-4", "gpt-3.5", "gpt-4"],
            "S1_Truth_T" => [0.6, 0.5, 0.7],
            "S1_Indet_I" => [0.3, 0.4, 0.2],
            "S1_Falsity_F" => [0.2, 0.3, 0.1],
            "S1_Sum_TIF" => [1.1, 1.2, 1.0],
            "S2_Truth_T" => [0.5, 0.4, 0.6],
            "S2_Indet_I" => [0.3, 0.35, 0.25],
            "S2_Falsity_F" => [0.2, 0.25, 0.15],
        ]
        .unwrap()
    }

    #[test]
    fn doubles_row_count() {
        let wide = wide_fixture();
        let n = wide.height();
        let long = reshape(wide).unwrap();
        assert_eq!(long.height(), 2 * n);
    }

    #[test]
    fn long_schema_is_canonical() {
        let long = reshape(wide_fixture()).unwrap();
        let names: Vec<&str> = long.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            ["Phenomenon", "Model", "Truth", "Indeterminacy", "Falsity", "Sum", "Strategy"]
        );
        for &name in &COMPONENT_COLS {
            assert_eq!(long.column(name).unwrap().dtype(), &DataType::Float64);
        }
    }

    #[test]
    fn strategy_blocks_preserve_input_order() {
        let wide = wide_fixture();
        let n = wide.height();
        let long = reshape(wide).unwrap();
        let strategy = long.column("Strategy").unwrap().str().unwrap();
        let model = long.column("Model").unwrap().str().unwrap();
        for i in 0..n {
            assert_eq!(strategy.get(i).unwrap(), STRATEGY_S1);
            assert_eq!(strategy.get(n + i).unwrap(), STRATEGY_S2);
            // Both blocks keep the source row order.
            assert_eq!(model.get(i), model.get(n + i));
        }
        assert_eq!(model.get(0).unwrap(), "gpt-4");
        assert_eq!(model.get(1).unwrap(), "gpt-3.5");
    }

    #[test]
    fn s2_sum_is_component_total() {
        let long = reshape(wide_fixture()).unwrap();
        let s2 = filter_strategy(&long, STRATEGY_S2).unwrap();
        let t = s2.column("Truth").unwrap().f64().unwrap();
        let i_ = s2.column("Indeterminacy").unwrap().f64().unwrap();
        let f = s2.column("Falsity").unwrap().f64().unwrap();
        let sum = s2.column("Sum").unwrap().f64().unwrap();
        for row in 0..s2.height() {
            let expected = t.get(row).unwrap() + i_.get(row).unwrap() + f.get(row).unwrap();
            assert!((sum.get(row).unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn s1_sum_passes_through_verbatim() {
        // Recorded sum (1.4) disagrees with the component total (1.1) on
        // purpose: a recompute would be caught here.
        let wide = df![
            "Phenomenon" => ["Ambiguity"],
            "Model" => ["gpt-4"],
            "S1_Truth_T" => [0.6],
            "S1_Indet_I" => [0.3],
            "S1_Falsity_F" => [0.2],
            "S1_Sum" => [1.4],
            "S2_Truth_T" => [0.5],
            "S2_Indet_I" => [0.3],
            "S2_Falsity_F" => [0.2],
        ]
        .unwrap();
        let long = reshape(wide).unwrap();
        let s1 = filter_strategy(&long, STRATEGY_S1).unwrap();
        let sum = s1.column("Sum").unwrap().f64().unwrap();
        assert_eq!(sum.get(0).unwrap(), 1.4);
    }

    #[test]
    fn header_aliases_produce_identical_tables() {
        let legacy = reshape(wide_fixture()).unwrap();

        let mut canonical = wide_fixture();
        canonical.rename("Phenomenon_Type", "Phenomenon".into()).unwrap();
        canonical.rename("S1_Sum_TIF", "S1_Sum".into()).unwrap();
        let canonical = reshape(canonical).unwrap();

        for name in ["Phenomenon", "Model", "Strategy"] {
            assert_eq!(
                crate::helper_functions::column_str(&legacy, name).unwrap(),
                crate::helper_functions::column_str(&canonical, name).unwrap(),
            );
        }
        for &name in &COMPONENT_COLS {
            assert_eq!(
                crate::helper_functions::column_f64_nan(&legacy, name).unwrap(),
                crate::helper_functions::column_f64_nan(&canonical, name).unwrap(),
            );
        }
    }

    #[test]
    fn whitespace_padded_headers_are_stripped() {
        let padded = df![
            " Phenomenon_Type " => ["Ambiguity"],
            "Model " => ["gpt-4"],
            " S1_Truth_T" => [0.6],
            "S1_Indet_I" => [0.3],
            "S1_Falsity_F" => [0.2],
            "S1_Sum_TIF" => [1.1],
            "S2_Truth_T" => [0.5],
            "S2_Indet_I" => [0.3],
            "S2_Falsity_F" => [0.2],
        ]
        .unwrap();
        let long = reshape(padded).unwrap();
        assert!(long.column("Phenomenon").is_ok());
        assert!(long.column("Model").is_ok());
        assert_eq!(long.height(), 2);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let incomplete = df![
            "Phenomenon" => ["Ambiguity"],
            "Model" => ["gpt-4"],
            "S1_Truth_T" => [0.6],
        ]
        .unwrap();
        assert!(reshape(incomplete).is_err());
    }

    #[test]
    fn ambiguity_scenario() {
        let wide = df![
            "Phenomenon" => ["Ambiguity"],
            "Model" => ["gpt-4"],
            "S1_Truth_T" => [0.6],
            "S1_Indet_I" => [0.3],
            "S1_Falsity_F" => [0.2],
            "S1_Sum" => [1.1],
            "S2_Truth_T" => [0.5],
            "S2_Indet_I" => [0.3],
            "S2_Falsity_F" => [0.2],
        ]
        .unwrap();
        let long = reshape(wide).unwrap();
        assert_eq!(long.height(), 2);

        let expected = [
            ("S1 (Neutrosophic)", 0.6, 0.3, 0.2, 1.1),
            ("S2 (Probabilistic)", 0.5, 0.3, 0.2, 1.0),
        ];
        let strategy = long.column("Strategy").unwrap().str().unwrap();
        let truth = long.column("Truth").unwrap().f64().unwrap();
        let indet = long.column("Indeterminacy").unwrap().f64().unwrap();
        let falsity = long.column("Falsity").unwrap().f64().unwrap();
        let sum = long.column("Sum").unwrap().f64().unwrap();
        for (row, &(tag, t, i, f, s)) in expected.iter().enumerate() {
            assert_eq!(strategy.get(row).unwrap(), tag);
            assert_eq!(truth.get(row).unwrap(), t);
            assert_eq!(indet.get(row).unwrap(), i);
            assert_eq!(falsity.get(row).unwrap(), f);
            assert!((sum.get(row).unwrap() - s).abs() < 1e-9);
        }
    }

    #[test]
    fn filter_strategy_splits_blocks() {
        let long = reshape(wide_fixture()).unwrap();
        let s1 = filter_strategy(&long, STRATEGY_S1).unwrap();
        let s2 = filter_strategy(&long, STRATEGY_S2).unwrap();
        assert_eq!(s1.height(), 3);
        assert_eq!(s2.height(), 3);
        assert_eq!(s1.height() + s2.height(), long.height());
    }
}
