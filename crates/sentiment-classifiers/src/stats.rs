//! Binary classification metrics and model evaluation.
use serde::{Deserialize, Serialize};

use crate::data_handling::FeatureSet;
use crate::error::{PipelineError, Result};
use crate::models::pipeline::FittedPipeline;

/// Confusion counts with label 1 as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

/// Train and holdout F1 of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub train: f64,
    pub test: f64,
}

pub fn confusion_counts(y_true: &[u8], y_pred: &[u8]) -> Result<ConfusionCounts> {
    if y_true.len() != y_pred.len() {
        return Err(PipelineError::value(format!(
            "y_true and y_pred must have equal lengths ({} vs {})",
            y_true.len(),
            y_pred.len()
        )));
    }
    let mut counts = ConfusionCounts::default();
    for (&t, &p) in y_true.iter().zip(y_pred) {
        match (t == 1, p == 1) {
            (true, true) => counts.true_positive += 1,
            (false, true) => counts.false_positive += 1,
            (false, false) => counts.true_negative += 1,
            (true, false) => counts.false_negative += 1,
        }
    }
    Ok(counts)
}

fn ratio(num: usize, den: usize, metric: &str) -> f64 {
    if den == 0 {
        log::warn!("{} is ill-defined (zero denominator); setting it to 0.0", metric);
        return 0.0;
    }
    num as f64 / den as f64
}

pub fn precision_score(y_true: &[u8], y_pred: &[u8]) -> Result<f64> {
    let c = confusion_counts(y_true, y_pred)?;
    Ok(ratio(c.true_positive, c.true_positive + c.false_positive, "Precision"))
}

pub fn recall_score(y_true: &[u8], y_pred: &[u8]) -> Result<f64> {
    let c = confusion_counts(y_true, y_pred)?;
    Ok(ratio(c.true_positive, c.true_positive + c.false_negative, "Recall"))
}

/// Harmonic mean of precision and recall, computed as 2TP / (2TP + FP + FN).
///
/// Returns 0.0 when there are neither positive labels nor positive predictions.
pub fn f1_score(y_true: &[u8], y_pred: &[u8]) -> Result<f64> {
    let c = confusion_counts(y_true, y_pred)?;
    Ok(ratio(
        2 * c.true_positive,
        2 * c.true_positive + c.false_positive + c.false_negative,
        "F-score",
    ))
}

/// Score a fitted model on its training and holdout sets.
pub fn evaluate_model(model: &FittedPipeline, train: &FeatureSet, test: &FeatureSet) -> Result<ScorePair> {
    let y_train_pred = model.predict(&train.x)?;
    let y_test_pred = model.predict(&test.x)?;

    let scores = ScorePair {
        train: f1_score(&train.y, &y_train_pred)?,
        test: f1_score(&test.y, &y_test_pred)?,
    };
    log::info!(
        "Evaluation: train F1={:.4} ({} rows), test F1={:.4} ({} rows)",
        scores.train,
        train.len(),
        scores.test,
        test.len()
    );
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f1_matches_harmonic_mean() {
        let y_true = [1, 1, 1, 0, 0, 1];
        let y_pred = [1, 0, 1, 1, 0, 1];
        let p = precision_score(&y_true, &y_pred).unwrap();
        let r = recall_score(&y_true, &y_pred).unwrap();
        let f1 = f1_score(&y_true, &y_pred).unwrap();
        assert!((p - 0.75).abs() < 1e-12);
        assert!((r - 0.75).abs() < 1e-12);
        assert!((f1 - 2.0 * p * r / (p + r)).abs() < 1e-12);
    }

    #[test]
    fn f1_zero_division_is_zero() {
        assert_eq!(f1_score(&[0, 0], &[0, 0]).unwrap(), 0.0);
        assert_eq!(f1_score(&[1, 1], &[0, 0]).unwrap(), 0.0);
    }

    #[test]
    fn f1_perfect_and_mismatched() {
        assert_eq!(f1_score(&[1, 0, 1], &[1, 0, 1]).unwrap(), 1.0);
        assert!(f1_score(&[1, 0], &[1]).is_err());
    }
}
