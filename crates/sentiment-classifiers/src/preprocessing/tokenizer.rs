use std::sync::Arc;

use regex::Regex;

use crate::config::VectorizerConfig;
use crate::error::{PipelineError, Result};

/// Regex word tokenizer with lowercasing and n-gram expansion.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    pattern: Arc<Regex>,
    lowercase: bool,
    ngram_range: (usize, usize),
}

impl Tokenizer {
    pub fn new(pattern: &str, lowercase: bool, ngram_range: (usize, usize)) -> Result<Self> {
        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(PipelineError::configuration(format!(
                "Invalid ngram_range ({}, {}): need 1 <= min <= max",
                min_n, max_n
            )));
        }
        let regex = Regex::new(pattern).map_err(|e| {
            PipelineError::configuration(format!("Invalid token pattern '{}': {}", pattern, e))
        })?;
        Ok(Self {
            pattern: Arc::new(regex),
            lowercase,
            ngram_range,
        })
    }

    pub fn from_config(config: &VectorizerConfig) -> Result<Self> {
        Self::new(&config.token_pattern, config.lowercase, config.ngram_range)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Split a document into word tokens.
    pub fn words(&self, text: &str) -> Vec<String> {
        if self.lowercase {
            let lowered = text.to_lowercase();
            self.pattern
                .find_iter(&lowered)
                .map(|m| m.as_str().to_string())
                .collect()
        } else {
            self.pattern
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect()
        }
    }

    /// Tokens plus the configured n-grams, joined with a single space.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let words = self.words(text);
        let (min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return words;
        }

        let mut out = Vec::new();
        for n in min_n..=max_n {
            if n == 1 {
                out.extend(words.iter().cloned());
                continue;
            }
            out.extend(words.windows(n).map(|w| w.join(" ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOKEN_PATTERN;

    #[test]
    fn default_pattern_skips_single_characters() {
        let tok = Tokenizer::new(DEFAULT_TOKEN_PATTERN, true, (1, 1)).unwrap();
        assert_eq!(
            tok.analyze("A GOOD racket, I'd buy it again!"),
            vec!["good", "racket", "buy", "it", "again"]
        );
    }

    #[test]
    fn bigrams_follow_unigrams() {
        let tok = Tokenizer::new(DEFAULT_TOKEN_PATTERN, true, (1, 2)).unwrap();
        assert_eq!(
            tok.analyze("very good grip"),
            vec!["very", "good", "grip", "very good", "good grip"]
        );
    }

    #[test]
    fn rejects_bad_ngram_range_and_pattern() {
        assert!(Tokenizer::new(DEFAULT_TOKEN_PATTERN, true, (2, 1)).is_err());
        assert!(Tokenizer::new(DEFAULT_TOKEN_PATTERN, true, (0, 1)).is_err());
        assert!(Tokenizer::new("(unclosed", true, (1, 1)).is_err());
    }
}
