//! End-to-end training run: load, project, split, grid search and evaluate.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::VectorizerCache;
use crate::data_handling::{input_output, train_test_split};
use crate::error::Result;
use crate::io::{load_reviews, normalize_column_name, LoaderConfig};
use crate::model_selection::{CvResults, GridSearchCv, HyperparameterGrid, ParamValue};
use crate::stats::{evaluate_model, ScorePair};

/// Parameters of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub data_path: PathBuf,
    pub loader: LoaderConfig,
    pub input_column: String,
    pub output_column: String,
    pub test_size: f64,
    pub random_state: u64,
    pub cv: usize,
    /// Vectorization cache directory; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    pub hyperparameters: HyperparameterGrid,
}

/// Single-candidate grid: count vectorizer capped at 5000 terms, alpha = 1.
pub fn default_hyperparameters() -> HyperparameterGrid {
    HyperparameterGrid::new()
        .with("vectorization", vec![ParamValue::from("count")])
        .with("vectorization__max_features", vec![ParamValue::Int(5000)])
        .with("classifier__alpha", vec![ParamValue::Int(1)])
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.csv"),
            loader: LoaderConfig::default(),
            input_column: "Review_text".to_string(),
            output_column: "Ratings".to_string(),
            test_size: 0.25,
            random_state: 42,
            cv: 4,
            cache_dir: Some(PathBuf::from(".cache")),
            hyperparameters: default_hyperparameters(),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowReport {
    pub scores: ScorePair,
    pub search: CvResults,
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub n_features: usize,
    pub finished_at: DateTime<Utc>,
}

/// Run the workflow, opening the configured cache directory if any.
pub fn run_workflow(config: &WorkflowConfig) -> Result<WorkflowReport> {
    let cache = match &config.cache_dir {
        Some(dir) => Some(VectorizerCache::open(dir)?),
        None => None,
    };
    run_workflow_with_cache(config, cache.as_ref())
}

/// Run the workflow with a caller-owned cache handle.
pub fn run_workflow_with_cache(
    config: &WorkflowConfig,
    cache: Option<&VectorizerCache>,
) -> Result<WorkflowReport> {
    log::info!("Loading reviews from {}", config.data_path.display());
    let table = load_reviews(&config.data_path, &config.loader)?;
    table.log_summary();

    let data = input_output(
        &table,
        &normalize_column_name(&config.input_column),
        &normalize_column_name(&config.output_column),
    )?;

    let split = train_test_split(&data, config.test_size, config.random_state)?;
    let train = split.train();
    let test = split.test();

    let search = GridSearchCv::new(config.hyperparameters.clone(), config.cv).fit(&train, cache)?;
    if let Some(cache) = cache {
        log::debug!(
            "Vectorization cache: {} hits, {} misses",
            cache.hits(),
            cache.misses()
        );
    }

    let scores = evaluate_model(&search.best_estimator, &train, &test)?;

    Ok(WorkflowReport {
        scores,
        n_rows: data.len(),
        n_train: train.len(),
        n_test: test.len(),
        n_features: search.best_estimator.n_features(),
        search: search.cv_results,
        finished_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_a_single_candidate() {
        let config = WorkflowConfig::default();
        assert_eq!(config.hyperparameters.n_candidates(), 1);
        assert_eq!(config.cv, 4);
        assert_eq!(config.random_state, 42);
        assert!((config.test_size - 0.25).abs() < 1e-12);
    }

    #[test]
    fn config_accepts_partial_json() {
        let config: WorkflowConfig =
            serde_json::from_str(r#"{"data_path": "reviews.csv", "cache_dir": null}"#).unwrap();
        assert_eq!(config.data_path, PathBuf::from("reviews.csv"));
        assert_eq!(config.cache_dir, None);
        assert_eq!(config.input_column, "Review_text");
        assert_eq!(config.hyperparameters, default_hyperparameters());
    }
}
