//! Two-stage text pipeline: `vectorization` followed by `classifier`.
use crate::cache::VectorizerCache;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::math::CountMatrix;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory::build_classifier;
use crate::preprocessing::CountVectorizer;

/// Unfitted pipeline description.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fit both stages on `docs`/`y`.
    ///
    /// When a cache is given, the vectorization stage is looked up by its
    /// configuration and input texts before being recomputed.
    pub fn fit(
        &self,
        docs: &[String],
        y: &[u8],
        cache: Option<&VectorizerCache>,
    ) -> Result<FittedPipeline> {
        if docs.len() != y.len() {
            return Err(PipelineError::value(format!(
                "Got {} documents but {} labels",
                docs.len(),
                y.len()
            )));
        }
        if docs.is_empty() {
            return Err(PipelineError::configuration(
                "Cannot fit a pipeline on an empty training set",
            ));
        }

        let mut vectorizer = CountVectorizer::new(self.config.vectorization.clone())?;
        let x = match cache {
            Some(cache) => cache.fit_transform(&mut vectorizer, docs)?,
            None => vectorizer.fit_transform(docs)?,
        };

        let mut classifier = build_classifier(&self.config.classifier);
        classifier.fit(&x, y)?;

        Ok(FittedPipeline {
            config: self.config.clone(),
            vectorizer,
            classifier,
        })
    }
}

/// A fitted vectorizer + classifier pair. Immutable once built.
pub struct FittedPipeline {
    config: PipelineConfig,
    vectorizer: CountVectorizer,
    classifier: Box<dyn ClassifierModel>,
}

impl FittedPipeline {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    pub fn transform(&self, docs: &[String]) -> Result<CountMatrix> {
        self.vectorizer.transform(docs)
    }

    pub fn predict(&self, docs: &[String]) -> Result<Vec<u8>> {
        let x = self.vectorizer.transform(docs)?;
        self.classifier.predict(&x)
    }

    pub fn predict_proba(&self, docs: &[String]) -> Result<Vec<f64>> {
        let x = self.vectorizer.transform(docs)?;
        self.classifier.predict_proba(&x)
    }
}

impl std::fmt::Debug for FittedPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FittedPipeline")
            .field("config", &self.config)
            .field("n_features", &self.n_features())
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<String>, Vec<u8>) {
        let docs = [
            "great racket love it",
            "excellent quality great grip",
            "love the feel excellent",
            "broken after one week",
            "poor quality broken strings",
            "waste of money poor",
        ];
        (
            docs.iter().map(|s| s.to_string()).collect(),
            vec![1, 1, 1, 0, 0, 0],
        )
    }

    #[test]
    fn fits_and_separates_training_data() {
        let (docs, y) = corpus();
        let fitted = Pipeline::default().fit(&docs, &y, None).unwrap();
        assert_eq!(fitted.predict(&docs).unwrap(), y);
        assert_eq!(fitted.classifier_name(), "multinomial_nb");

        let unseen = vec!["great love".to_string(), "broken poor".to_string()];
        assert_eq!(fitted.predict(&unseen).unwrap(), vec![1, 0]);
    }

    #[test]
    fn empty_training_set_is_a_configuration_error() {
        let err = Pipeline::default().fit(&[], &[], None).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }
}
