use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::VectorizerConfig;
use crate::error::{PipelineError, Result};
use crate::math::CountMatrix;
use crate::preprocessing::tokenizer::Tokenizer;

/// Learned term to column mapping. Terms are kept in alphabetical order, so
/// the column of a term is its position in `terms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new(mut terms: Vec<String>) -> Self {
        terms.sort_unstable();
        terms.dedup();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Rebuild the lookup table after deserialization.
    pub fn reindex(self) -> Self {
        Self::new(self.terms)
    }
}

/// Bag-of-words transformer: text in, term counts out.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    config: VectorizerConfig,
    tokenizer: Tokenizer,
    vocabulary: Option<Vocabulary>,
}

impl CountVectorizer {
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        if config.min_df == 0 {
            return Err(PipelineError::configuration("min_df must be >= 1"));
        }
        if config.max_features == Some(0) {
            return Err(PipelineError::configuration(
                "max_features must be >= 1 or unset",
            ));
        }
        let tokenizer = Tokenizer::from_config(&config)?;
        Ok(Self {
            config,
            tokenizer,
            vocabulary: None,
        })
    }

    /// A vectorizer that already knows its vocabulary (e.g. restored from cache).
    pub fn from_vocabulary(config: VectorizerConfig, vocabulary: Vocabulary) -> Result<Self> {
        let mut vectorizer = Self::new(config)?;
        vectorizer.vocabulary = Some(vocabulary);
        Ok(vectorizer)
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, Vocabulary::len)
    }

    fn analyze_all(&self, docs: &[String]) -> Vec<Vec<String>> {
        docs.par_iter()
            .map(|doc| self.tokenizer.analyze(doc))
            .collect()
    }

    /// Learn the vocabulary and return the count matrix of `docs`.
    pub fn fit_transform(&mut self, docs: &[String]) -> Result<CountMatrix> {
        let analyzed = self.analyze_all(docs);

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &analyzed {
            let mut seen: HashSet<&str> = HashSet::new();
            for token in tokens {
                *term_freq.entry(token.as_str()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut candidates: Vec<(&str, usize)> = term_freq
            .into_iter()
            .filter(|(term, _)| doc_freq.get(term).copied().unwrap_or(0) >= self.config.min_df)
            .collect();

        if let Some(limit) = self.config.max_features {
            candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            candidates.truncate(limit);
        }

        if candidates.is_empty() {
            return Err(PipelineError::value(
                "Empty vocabulary; the documents contain no tokens matching the token pattern",
            ));
        }

        let vocabulary = Vocabulary::new(candidates.into_iter().map(|(t, _)| t.to_string()).collect());
        log::debug!(
            "Fitted vocabulary of {} terms on {} documents",
            vocabulary.len(),
            docs.len()
        );
        self.vocabulary = Some(vocabulary);

        Ok(self.counts(&analyzed))
    }

    /// Count matrix of `docs` against the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, docs: &[String]) -> Result<CountMatrix> {
        if self.vocabulary.is_none() {
            return Err(PipelineError::configuration(
                "CountVectorizer must be fitted before transform",
            ));
        }
        let analyzed = self.analyze_all(docs);
        Ok(self.counts(&analyzed))
    }

    fn counts(&self, analyzed: &[Vec<String>]) -> CountMatrix {
        let vocabulary = match &self.vocabulary {
            Some(v) => v,
            None => return CountMatrix::from_rows(&[], 0),
        };
        let rows: Vec<Vec<(usize, f64)>> = analyzed
            .iter()
            .map(|tokens| {
                let mut counts: HashMap<usize, f64> = HashMap::new();
                for token in tokens {
                    if let Some(col) = vocabulary.get(token) {
                        *counts.entry(col).or_insert(0.0) += 1.0;
                    }
                }
                let mut row: Vec<(usize, f64)> = counts
                    .into_iter()
                    .map(|(c, v)| (c, if self.config.binary { 1.0 } else { v }))
                    .collect();
                row.sort_unstable_by_key(|&(c, _)| c);
                row
            })
            .collect();
        CountMatrix::from_rows(&rows, vocabulary.len())
    }
}
