use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::analysis::correlation::plot_correlation_heatmap;
use crate::analysis::distribution::{plot_components_distribution, plot_hypertruth_sum};
use crate::analysis::ethical_contradiction::plot_ethical_contradiction;
use crate::analysis::model_performance::plot_model_performance;
use crate::analysis::stats::log_component_summary;
use crate::analysis::strategy_comparison::plot_s1_vs_s2_comparison;
use crate::data_handling::neutrosophic_results::NeutrosophicResults;

mod analysis;
mod data_handling;
mod helper_functions;
mod models;

const DATA_PATH: &str = "data/openai_neutrosophic_results.csv";
const RESULTS_DIR: &str = "results";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting neutrosophic score analysis");

    std::fs::create_dir_all(RESULTS_DIR)
        .with_context(|| format!("failed to create results directory '{RESULTS_DIR}'"))?;

    let dataset = NeutrosophicResults {
        path: DATA_PATH.to_string(),
    };
    let reshaped = dataset
        .load_reshaped()
        .with_context(|| format!("failed to load scoring results from '{DATA_PATH}'"))?;

    log_component_summary(&reshaped)?;

    println!("Generating figures...");
    plot_components_distribution(&reshaped, &fig_path("fig1_components_distribution.png"))?;
    plot_hypertruth_sum(&reshaped, &fig_path("fig2_hypertruth_sum.png"))?;
    plot_s1_vs_s2_comparison(&reshaped, &fig_path("fig3_s1_vs_s2_comparison.png"))?;
    plot_model_performance(&reshaped, &fig_path("fig4_model_performance.png"))?;
    plot_correlation_heatmap(&reshaped, &fig_path("fig5_correlation_heatmap.png"))?;
    plot_ethical_contradiction(&reshaped, &fig_path("fig6_ethical_contradiction.png"))?;

    let n_files = std::fs::read_dir(RESULTS_DIR)
        .with_context(|| format!("failed to read results directory '{RESULTS_DIR}'"))?
        .count();
    println!("Analysis complete. {n_files} figures saved to {RESULTS_DIR}/");

    Ok(())
}

fn fig_path(name: &str) -> String {
    format!("{RESULTS_DIR}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::neutrosophic_results::reshape;
    use polars::df;
    use polars::prelude::DataFrame;

    fn scoring_fixture() -> DataFrame {
        df![
            "Phenomenon_Type" => [
                "Ambiguity", "Ambiguity", "Vagueness", "Vagueness",
                "Contradiction (Ethical)", "Contradiction (Ethical)",
                "Contradiction (Ethical)", "Ambiguity",
            ],
            "Model" => [
                "gpt-4", "gpt-3.5", "gpt-4", "gpt-3.5",
                "gpt-4", "gpt-3.5", "gpt-4", "gpt-4",
            ],
            "S1_Truth_T" => [0.6, 0.5, 0.7, 0.4, 0.55, 0.45, 0.6, 0.65],
            "S1_Indet_I" => [0.3, 0.4, 0.2, 0.5, 0.6, 0.7, 0.5, 0.25],
            "S1_Falsity_F" => [0.2, 0.3, 0.1, 0.3, 0.5, 0.55, 0.45, 0.15],
            "S1_Sum_TIF" => [1.1, 1.2, 1.0, 1.2, 1.65, 1.7, 1.55, 1.05],
            "S2_Truth_T" => [0.5, 0.4, 0.6, 0.35, 0.4, 0.35, 0.45, 0.55],
            "S2_Indet_I" => [0.3, 0.35, 0.25, 0.4, 0.35, 0.4, 0.3, 0.25],
            "S2_Falsity_F" => [0.2, 0.25, 0.15, 0.25, 0.25, 0.25, 0.25, 0.2],
        ]
        .unwrap()
    }

    #[test]
    fn full_pipeline_writes_six_figures() {
        let reshaped = reshape(scoring_fixture()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = |name: &str| dir.path().join(name).to_string_lossy().to_string();

        plot_components_distribution(&reshaped, &out("fig1_components_distribution.png")).unwrap();
        plot_hypertruth_sum(&reshaped, &out("fig2_hypertruth_sum.png")).unwrap();
        plot_s1_vs_s2_comparison(&reshaped, &out("fig3_s1_vs_s2_comparison.png")).unwrap();
        plot_model_performance(&reshaped, &out("fig4_model_performance.png")).unwrap();
        plot_correlation_heatmap(&reshaped, &out("fig5_correlation_heatmap.png")).unwrap();
        plot_ethical_contradiction(&reshaped, &out("fig6_ethical_contradiction.png")).unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "fig1_components_distribution.png",
                "fig2_hypertruth_sum.png",
                "fig3_s1_vs_s2_comparison.png",
                "fig4_model_performance.png",
                "fig5_correlation_heatmap.png",
                "fig6_ethical_contradiction.png",
            ]
        );
        for name in names {
            let meta = std::fs::metadata(dir.path().join(name)).unwrap();
            assert!(meta.len() > 0);
        }
    }

    #[test]
    fn loader_reads_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("scores.csv");
        std::fs::write(
            &csv_path,
            "Phenomenon_Type,Model, S1_Truth_T,S1_Indet_I,S1_Falsity_F,S1_Sum_TIF,S2_Truth_T,S2_Indet_I,S2_Falsity_F\n\
             Ambiguity,gpt-4,0.6,0.3,0.2,1.1,0.5,0.3,0.2\n",
        )
        .unwrap();

        let dataset = NeutrosophicResults {
            path: csv_path.to_string_lossy().to_string(),
        };
        let long = dataset.load_reshaped().unwrap();
        assert_eq!(long.height(), 2);
        assert!(long.column("Truth").is_ok());
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dataset = NeutrosophicResults {
            path: "does/not/exist.csv".to_string(),
        };
        assert!(dataset.load().is_err());
    }
}
