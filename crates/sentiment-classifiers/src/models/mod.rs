pub mod classifier_trait;
pub mod factory;
pub mod naive_bayes;
pub mod pipeline;

pub use classifier_trait::ClassifierModel;
pub use naive_bayes::MultinomialNB;
pub use pipeline::{FittedPipeline, Pipeline};
