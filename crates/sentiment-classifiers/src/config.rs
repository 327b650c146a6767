use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default token pattern: runs of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Which text-to-count transformer fills the `vectorization` stage.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VectorizerKind {
    /// Raw term counts.
    Count,
    /// Term presence (0/1) instead of counts.
    Binary,
}

impl FromStr for VectorizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" | "countvectorizer" | "bag_of_words" => Ok(VectorizerKind::Count),
            "binary" => Ok(VectorizerKind::Binary),
            _ => Err(format!(
                "Unknown vectorizer: {}. Expected one of: count, binary",
                s
            )),
        }
    }
}

/// Bag-of-words vectorizer settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VectorizerConfig {
    pub lowercase: bool,
    pub token_pattern: String,
    pub ngram_range: (usize, usize),
    /// Keep only the N most frequent terms across the corpus.
    pub max_features: Option<usize>,
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    pub binary: bool,
}

impl VectorizerConfig {
    pub fn from_kind(kind: VectorizerKind) -> Self {
        match kind {
            VectorizerKind::Count => Self::default(),
            VectorizerKind::Binary => Self {
                binary: true,
                ..Self::default()
            },
        }
    }
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            ngram_range: (1, 1),
            max_features: None,
            min_df: 1,
            binary: false,
        }
    }
}

/// Supported classifiers and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ClassifierType {
    MultinomialNB { alpha: f64, fit_prior: bool },
}

impl Default for ClassifierType {
    fn default() -> Self {
        ClassifierType::MultinomialNB {
            alpha: 1.0,
            fit_prior: true,
        }
    }
}

impl FromStr for ClassifierType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multinomial_nb" | "multinomialnb" | "naive_bayes" => Ok(ClassifierType::default()),
            _ => Err(format!(
                "Unknown classifier: {}. Expected one of: multinomial_nb",
                s
            )),
        }
    }
}

/// Full configuration of the two-stage text pipeline.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub vectorization: VectorizerConfig,
    pub classifier: ClassifierType,
}

impl PipelineConfig {
    pub fn new(vectorization: VectorizerConfig, classifier: ClassifierType) -> Self {
        Self {
            vectorization,
            classifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_kind_sets_flag() {
        let cfg = VectorizerConfig::from_kind(VectorizerKind::Binary);
        assert!(cfg.binary);
        assert_eq!(cfg.ngram_range, (1, 1));
    }

    #[test]
    fn classifier_from_str() {
        let ct: ClassifierType = "MultinomialNB".parse().unwrap();
        assert_eq!(ct, ClassifierType::default());
        assert!("svm".parse::<ClassifierType>().is_err());
    }
}
