use polars::prelude::PolarsError;

/// Strategy tags carried by every long-form row.
pub const STRATEGY_S1: &str = "S1 (Neutrosophic)";
pub const STRATEGY_S2: &str = "S2 (Probabilistic)";

/// Phenomenon label singled out by the contradiction scatter figure.
pub const ETHICAL_CONTRADICTION: &str = "Contradiction (Ethical)";

/// Canonical long-form score columns, in table order.
pub const COMPONENT_COLS: [&str; 4] = ["Truth", "Indeterminacy", "Falsity", "Sum"];

pub fn polars_err(e: Box<dyn std::error::Error>) -> PolarsError {
    PolarsError::ComputeError(format!("{e}").into())
}
