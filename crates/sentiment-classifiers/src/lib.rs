//! sentiment-classifiers: bag-of-words sentiment training for product reviews.
//!
//! This crate loads review tables, derives binary labels from ratings, splits
//! train/holdout data, and fits a count-vectorizer + multinomial naive Bayes
//! pipeline by cross-validated grid search. The vectorization stage can be
//! memoized on disk through an explicit `cache::VectorizerCache` handle.
//!
//! `workflow::run_workflow` chains the steps and returns train/test F1 scores.
pub mod cache;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod math;
pub mod model_selection;
pub mod models;
pub mod preprocessing;
pub mod stats;
pub mod workflow;

pub use error::{ErrorKind, PipelineError, Result};
