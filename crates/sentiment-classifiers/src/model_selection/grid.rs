//! Parameter grids with stage-qualified names.
//!
//! A name is either a stage (`vectorization`, `classifier`), which swaps the
//! whole stage for a fresh default instance of the named kind, or
//! `<stage>__<param>`, which sets one parameter of that stage.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ClassifierType, PipelineConfig, VectorizerConfig, VectorizerKind};
use crate::error::{PipelineError, Result};

pub const VECTORIZATION_STAGE: &str = "vectorization";
pub const CLASSIFIER_STAGE: &str = "classifier";

/// One candidate value in a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Pair(i64, i64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "null"),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Pair(a, b) => write!(f, "({}, {})", a, b),
            ParamValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

/// One point of the grid: parameter name to chosen value.
pub type ParamSet = BTreeMap<String, ParamValue>;

/// Parameter name to candidate values. Names iterate in sorted order and the
/// last name varies fastest when candidates are enumerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HyperparameterGrid {
    params: BTreeMap<String, Vec<ParamValue>>,
}

impl HyperparameterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, values: Vec<ParamValue>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn insert(&mut self, name: &str, values: Vec<ParamValue>) {
        self.params.insert(name.to_string(), values);
    }

    pub fn params(&self) -> &BTreeMap<String, Vec<ParamValue>> {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The grid must name at least one parameter and every parameter needs
    /// at least one candidate.
    pub fn validate(&self) -> Result<()> {
        if self.params.is_empty() {
            return Err(PipelineError::value("Hyperparameter grid is empty"));
        }
        if let Some((name, _)) = self.params.iter().find(|(_, values)| values.is_empty()) {
            return Err(PipelineError::value(format!(
                "Parameter grid for '{}' must be a non-empty list",
                name
            )));
        }
        Ok(())
    }

    pub fn n_candidates(&self) -> usize {
        self.params.values().map(Vec::len).product()
    }

    /// Every combination of candidate values.
    pub fn candidates(&self) -> Vec<ParamSet> {
        let entries: Vec<(&String, &Vec<ParamValue>)> = self.params.iter().collect();
        Self::cartesian_product(&entries)
    }

    fn cartesian_product(entries: &[(&String, &Vec<ParamValue>)]) -> Vec<ParamSet> {
        let Some(((name, values), rest)) = entries.split_first() else {
            return vec![ParamSet::new()];
        };
        let rest_sets = Self::cartesian_product(rest);
        values
            .iter()
            .flat_map(|value| {
                rest_sets.iter().map(move |set| {
                    let mut set = set.clone();
                    set.insert((*name).clone(), value.clone());
                    set
                })
            })
            .collect()
    }
}

/// Render a candidate as `name=value, ...` for logs.
pub fn describe(params: &ParamSet) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_error(name: &str, expected: &str, value: &ParamValue) -> PipelineError {
    PipelineError::configuration(format!(
        "Parameter '{}' expects {}, got {}",
        name, expected, value
    ))
}

fn as_bool(name: &str, value: &ParamValue) -> Result<bool> {
    match value {
        ParamValue::Bool(v) => Ok(*v),
        other => Err(type_error(name, "a boolean", other)),
    }
}

fn as_positive_usize(name: &str, value: &ParamValue) -> Result<usize> {
    match value {
        ParamValue::Int(v) if *v >= 1 => Ok(*v as usize),
        other => Err(type_error(name, "an integer >= 1", other)),
    }
}

fn as_non_negative_f64(name: &str, value: &ParamValue) -> Result<f64> {
    let v = match value {
        ParamValue::Int(v) => *v as f64,
        ParamValue::Float(v) => *v,
        other => return Err(type_error(name, "a number", other)),
    };
    if !(v >= 0.0) || !v.is_finite() {
        return Err(type_error(name, "a finite number >= 0", value));
    }
    Ok(v)
}

fn as_text<'a>(name: &str, value: &'a ParamValue) -> Result<&'a str> {
    match value {
        ParamValue::Text(v) => Ok(v.as_str()),
        other => Err(type_error(name, "a string", other)),
    }
}

fn set_vectorizer_param(
    config: &mut VectorizerConfig,
    name: &str,
    param: &str,
    value: &ParamValue,
) -> Result<()> {
    match param {
        "max_features" => {
            config.max_features = match value {
                ParamValue::Null => None,
                other => Some(as_positive_usize(name, other)?),
            }
        }
        "lowercase" => config.lowercase = as_bool(name, value)?,
        "binary" => config.binary = as_bool(name, value)?,
        "min_df" => config.min_df = as_positive_usize(name, value)?,
        "token_pattern" => config.token_pattern = as_text(name, value)?.to_string(),
        "ngram_range" => match value {
            ParamValue::Pair(lo, hi) if *lo >= 1 && lo <= hi => {
                config.ngram_range = (*lo as usize, *hi as usize)
            }
            other => return Err(type_error(name, "a pair [min, max] with 1 <= min <= max", other)),
        },
        _ => {
            return Err(PipelineError::configuration(format!(
                "Invalid parameter '{}' for stage '{}'. Valid parameters: binary, lowercase, max_features, min_df, ngram_range, token_pattern",
                param, VECTORIZATION_STAGE
            )))
        }
    }
    Ok(())
}

fn set_classifier_param(
    classifier: &mut ClassifierType,
    name: &str,
    param: &str,
    value: &ParamValue,
) -> Result<()> {
    match classifier {
        ClassifierType::MultinomialNB { alpha, fit_prior } => match param {
            "alpha" => *alpha = as_non_negative_f64(name, value)?,
            "fit_prior" => *fit_prior = as_bool(name, value)?,
            _ => {
                return Err(PipelineError::configuration(format!(
                    "Invalid parameter '{}' for stage '{}'. Valid parameters: alpha, fit_prior",
                    param, CLASSIFIER_STAGE
                )))
            }
        },
    }
    Ok(())
}

/// Apply a candidate on top of `base`.
///
/// Whole-stage replacements are applied before stage parameters, so
/// `{vectorization: "count", vectorization__max_features: 5000}` yields a
/// fresh count vectorizer limited to 5000 terms.
pub fn resolve_candidate(base: &PipelineConfig, params: &ParamSet) -> Result<PipelineConfig> {
    let mut config = base.clone();

    for (name, value) in params.iter().filter(|(name, _)| !name.contains("__")) {
        match name.as_str() {
            VECTORIZATION_STAGE => {
                let kind: VectorizerKind = as_text(name, value)?
                    .parse()
                    .map_err(PipelineError::configuration)?;
                config.vectorization = VectorizerConfig::from_kind(kind);
            }
            CLASSIFIER_STAGE => {
                config.classifier = as_text(name, value)?
                    .parse()
                    .map_err(PipelineError::configuration)?;
            }
            other => {
                return Err(PipelineError::configuration(format!(
                    "Unknown pipeline stage '{}'. Valid stages: {}, {}",
                    other, VECTORIZATION_STAGE, CLASSIFIER_STAGE
                )))
            }
        }
    }

    for (name, value) in params.iter().filter(|(name, _)| name.contains("__")) {
        let (stage, param) = name
            .split_once("__")
            .ok_or_else(|| PipelineError::configuration(format!("Malformed parameter '{}'", name)))?;
        match stage {
            VECTORIZATION_STAGE => set_vectorizer_param(&mut config.vectorization, name, param, value)?,
            CLASSIFIER_STAGE => set_classifier_param(&mut config.classifier, name, param, value)?,
            other => {
                return Err(PipelineError::configuration(format!(
                    "Parameter '{}' does not match any pipeline stage (got stage '{}')",
                    name, other
                )))
            }
        }
    }

    Ok(config)
}
