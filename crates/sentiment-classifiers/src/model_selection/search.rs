use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cache::VectorizerCache;
use crate::config::PipelineConfig;
use crate::data_handling::FeatureSet;
use crate::error::{PipelineError, Result};
use crate::model_selection::folds::StratifiedKFold;
use crate::model_selection::grid::{describe, resolve_candidate, HyperparameterGrid, ParamSet};
use crate::models::pipeline::{FittedPipeline, Pipeline};
use crate::stats::f1_score;

/// Cross-validation record of one grid candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub params: ParamSet,
    pub split_test_scores: Vec<f64>,
    pub mean_test_score: f64,
    pub std_test_score: f64,
    /// 1 = best; tied candidates share the lowest rank.
    pub rank_test_score: usize,
    pub split_train_scores: Vec<f64>,
    pub mean_train_score: f64,
    pub std_train_score: f64,
    /// Seconds.
    pub mean_fit_time: f64,
    /// Seconds.
    pub mean_score_time: f64,
}

/// Full search trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvResults {
    pub n_splits: usize,
    pub best_index: usize,
    pub best_score: f64,
    pub best_params: ParamSet,
    pub candidates: Vec<CandidateResult>,
}

/// Outcome of `GridSearchCv::fit`: the refitted winner plus the trace.
#[derive(Debug)]
pub struct GridSearchResult {
    pub best_estimator: FittedPipeline,
    pub cv_results: CvResults,
    /// Seconds spent refitting the best candidate on the full training set.
    pub refit_time: f64,
}

/// Exhaustive grid search over the text pipeline, scored by F1 on held-out folds.
#[derive(Debug, Clone)]
pub struct GridSearchCv {
    base: PipelineConfig,
    grid: HyperparameterGrid,
    cv: usize,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Rank descending with ties sharing the minimum rank.
fn rank_min(scores: &[f64]) -> Vec<usize> {
    scores
        .iter()
        .map(|s| 1 + scores.iter().filter(|other| *other > s).count())
        .collect()
}

impl GridSearchCv {
    pub fn new(grid: HyperparameterGrid, cv: usize) -> Self {
        Self {
            base: PipelineConfig::default(),
            grid,
            cv,
        }
    }

    /// Start candidates from `base` instead of the default pipeline.
    pub fn with_base(mut self, base: PipelineConfig) -> Self {
        self.base = base;
        self
    }

    pub fn grid(&self) -> &HyperparameterGrid {
        &self.grid
    }

    pub fn cv(&self) -> usize {
        self.cv
    }

    /// Run the search on `train` and refit the best candidate on all of it.
    ///
    /// # Arguments
    ///
    /// * `train` - Training texts and labels.
    /// * `cache` - Optional vectorization cache shared by every fit.
    pub fn fit(&self, train: &FeatureSet, cache: Option<&VectorizerCache>) -> Result<GridSearchResult> {
        self.grid.validate()?;
        let candidates = self.grid.candidates();
        let configs = candidates
            .iter()
            .map(|params| resolve_candidate(&self.base, params))
            .collect::<Result<Vec<_>>>()?;

        if train.x.len() != train.y.len() {
            return Err(PipelineError::value(format!(
                "Got {} documents but {} labels",
                train.x.len(),
                train.y.len()
            )));
        }
        if train.is_empty() {
            return Err(PipelineError::configuration(
                "Cannot run a grid search on an empty training set",
            ));
        }

        let folds = StratifiedKFold::new(self.cv)?.split(&train.y)?;
        log::info!(
            "Fitting {} folds for each of {} candidates, totalling {} fits",
            folds.len(),
            candidates.len(),
            folds.len() * candidates.len()
        );

        let mut results = Vec::with_capacity(candidates.len());
        for (idx, (params, config)) in candidates.iter().zip(&configs).enumerate() {
            let pipeline = Pipeline::new(config.clone());
            let mut test_scores = Vec::with_capacity(folds.len());
            let mut train_scores = Vec::with_capacity(folds.len());
            let mut fit_times = Vec::with_capacity(folds.len());
            let mut score_times = Vec::with_capacity(folds.len());

            for (fold, (train_idx, test_idx)) in folds.iter().enumerate() {
                let fold_train = train.select(train_idx);
                let fold_test = train.select(test_idx);

                let started = Instant::now();
                let fitted = pipeline.fit(&fold_train.x, &fold_train.y, cache)?;
                fit_times.push(started.elapsed().as_secs_f64());

                let started = Instant::now();
                let test_score = f1_score(&fold_test.y, &fitted.predict(&fold_test.x)?)?;
                score_times.push(started.elapsed().as_secs_f64());
                let train_score = f1_score(&fold_train.y, &fitted.predict(&fold_train.x)?)?;

                log::debug!(
                    "[CV {}/{}] {}; test F1={:.3}, train F1={:.3}",
                    fold + 1,
                    folds.len(),
                    describe(params),
                    test_score,
                    train_score
                );
                test_scores.push(test_score);
                train_scores.push(train_score);
            }

            log::debug!(
                "Candidate {} ({}): mean test F1={:.4}",
                idx,
                describe(params),
                mean(&test_scores)
            );

            results.push(CandidateResult {
                params: params.clone(),
                mean_test_score: mean(&test_scores),
                std_test_score: std_dev(&test_scores),
                rank_test_score: 0,
                mean_train_score: mean(&train_scores),
                std_train_score: std_dev(&train_scores),
                split_test_scores: test_scores,
                split_train_scores: train_scores,
                mean_fit_time: mean(&fit_times),
                mean_score_time: mean(&score_times),
            });
        }

        let means: Vec<f64> = results.iter().map(|r| r.mean_test_score).collect();
        for (result, rank) in results.iter_mut().zip(rank_min(&means)) {
            result.rank_test_score = rank;
        }

        // first candidate wins ties
        let best_index = means
            .iter()
            .enumerate()
            .fold(0, |best, (i, &s)| if s > means[best] { i } else { best });
        let best_params = candidates[best_index].clone();
        let best_score = means[best_index];

        log::info!(
            "Best candidate {} ({}) with mean CV F1={:.4}",
            best_index,
            describe(&best_params),
            best_score
        );

        let started = Instant::now();
        let best_estimator = Pipeline::new(configs[best_index].clone()).fit(&train.x, &train.y, cache)?;
        let refit_time = started.elapsed().as_secs_f64();

        Ok(GridSearchResult {
            best_estimator,
            cv_results: CvResults {
                n_splits: folds.len(),
                best_index,
                best_score,
                best_params,
                candidates: results,
            },
            refit_time,
        })
    }
}
