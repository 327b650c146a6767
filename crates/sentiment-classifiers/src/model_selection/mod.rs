//! Hyperparameter search over the text pipeline.
//!
//! `grid` expands a parameter grid into candidate pipeline configurations,
//! `folds` produces stratified cross-validation splits and `search` runs the
//! exhaustive cross-validated search and refits the winner.
pub mod folds;
pub mod grid;
pub mod search;

pub use folds::StratifiedKFold;
pub use grid::{resolve_candidate, HyperparameterGrid, ParamSet, ParamValue};
pub use search::{CandidateResult, CvResults, GridSearchCv, GridSearchResult};
