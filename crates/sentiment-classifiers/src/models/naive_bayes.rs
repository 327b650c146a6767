use ndarray::{Array1, Array2};

use crate::error::{PipelineError, Result};
use crate::math::CountMatrix;
use crate::models::classifier_trait::ClassifierModel;

/// Smallest smoothing value used when a smaller `alpha` is requested.
const MIN_ALPHA: f64 = 1e-10;

/// Multinomial naive Bayes over term counts.
///
/// Per-class term probabilities are estimated with additive (Laplace/Lidstone)
/// smoothing:
///
/// P(term | class) = (count(term, class) + alpha) / (count(class) + alpha * n_features)
#[derive(Debug, Clone)]
pub struct MultinomialNB {
    alpha: f64,
    fit_prior: bool,
    classes: Vec<u8>,
    class_log_prior: Array1<f64>,
    feature_log_prob: Array2<f64>,
}

impl MultinomialNB {
    pub fn new(alpha: f64, fit_prior: bool) -> Self {
        MultinomialNB {
            alpha,
            fit_prior,
            classes: Vec::new(),
            class_log_prior: Array1::zeros(0),
            feature_log_prob: Array2::zeros((0, 0)),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn classes(&self) -> &[u8] {
        &self.classes
    }

    pub fn class_log_prior(&self) -> &Array1<f64> {
        &self.class_log_prior
    }

    pub fn feature_log_prob(&self) -> &Array2<f64> {
        &self.feature_log_prob
    }

    fn check_fitted(&self, x: &CountMatrix) -> Result<()> {
        if self.classes.is_empty() {
            return Err(PipelineError::configuration(
                "MultinomialNB must be fitted before predicting",
            ));
        }
        if x.ncols() != self.feature_log_prob.ncols() {
            return Err(PipelineError::value(format!(
                "Expected {} features, got {}",
                self.feature_log_prob.ncols(),
                x.ncols()
            )));
        }
        Ok(())
    }

    /// Unnormalized log posterior, shape (n_samples, n_classes).
    fn joint_log_likelihood(&self, x: &CountMatrix) -> Array2<f64> {
        let n_classes = self.classes.len();
        let mut jll = Array2::zeros((x.nrows(), n_classes));
        x.for_each_row(|r, cols, vals| {
            for c in 0..n_classes {
                let mut total = self.class_log_prior[c];
                for (&col, &val) in cols.iter().zip(vals) {
                    total += val * self.feature_log_prob[[c, col]];
                }
                jll[[r, c]] = total;
            }
        });
        jll
    }
}

impl ClassifierModel for MultinomialNB {
    fn fit(&mut self, x: &CountMatrix, y: &[u8]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(PipelineError::value(format!(
                "Feature matrix has {} rows but {} labels were given",
                x.nrows(),
                y.len()
            )));
        }
        if y.is_empty() {
            return Err(PipelineError::configuration(
                "Cannot fit MultinomialNB on an empty training set",
            ));
        }
        if !(self.alpha >= 0.0) {
            return Err(PipelineError::configuration(format!(
                "alpha must be >= 0, got {}",
                self.alpha
            )));
        }
        let alpha = if self.alpha < MIN_ALPHA {
            log::warn!(
                "alpha too small ({}); using {} to avoid log(0)",
                self.alpha,
                MIN_ALPHA
            );
            MIN_ALPHA
        } else {
            self.alpha
        };

        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let n_classes = classes.len();
        let n_features = x.ncols();

        let class_of = |label: u8| classes.iter().position(|&c| c == label).unwrap_or(0);

        let mut feature_count = Array2::<f64>::zeros((n_classes, n_features));
        let mut class_count = Array1::<f64>::zeros(n_classes);
        x.for_each_row(|r, cols, vals| {
            let c = class_of(y[r]);
            class_count[c] += 1.0;
            for (&col, &val) in cols.iter().zip(vals) {
                feature_count[[c, col]] += val;
            }
        });

        let mut feature_log_prob = Array2::<f64>::zeros((n_classes, n_features));
        for c in 0..n_classes {
            let total: f64 = feature_count.row(c).sum() + alpha * n_features as f64;
            let log_total = total.ln();
            for j in 0..n_features {
                feature_log_prob[[c, j]] = (feature_count[[c, j]] + alpha).ln() - log_total;
            }
        }

        let class_log_prior = if self.fit_prior {
            let n = class_count.sum();
            class_count.mapv(|count| (count / n).ln())
        } else {
            Array1::from_elem(n_classes, -(n_classes as f64).ln())
        };

        log::trace!(
            "Fitted MultinomialNB on {} samples, {} features, classes {:?}",
            y.len(),
            n_features,
            classes
        );

        self.classes = classes;
        self.class_log_prior = class_log_prior;
        self.feature_log_prob = feature_log_prob;
        Ok(())
    }

    fn predict(&self, x: &CountMatrix) -> Result<Vec<u8>> {
        self.check_fitted(x)?;
        let jll = self.joint_log_likelihood(x);
        Ok(jll
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for c in 1..row.len() {
                    if row[c] > row[best] {
                        best = c;
                    }
                }
                self.classes[best]
            })
            .collect())
    }

    fn predict_proba(&self, x: &CountMatrix) -> Result<Vec<f64>> {
        self.check_fitted(x)?;
        let positive = match self.classes.iter().position(|&c| c == 1) {
            Some(idx) => idx,
            None => return Ok(vec![0.0; x.nrows()]),
        };
        let jll = self.joint_log_likelihood(x);
        Ok(jll
            .rows()
            .into_iter()
            .map(|row| {
                let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let norm: f64 = row.iter().map(|v| (v - max).exp()).sum();
                (row[positive] - max).exp() / norm
            })
            .collect())
    }

    fn name(&self) -> &str {
        "multinomial_nb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (CountMatrix, Vec<u8>) {
        // columns: 0 = "great", 1 = "broken"
        let x = CountMatrix::from_rows(
            &[
                vec![(0, 2.0)],
                vec![(0, 1.0)],
                vec![(1, 2.0)],
                vec![(1, 1.0), (0, 1.0)],
            ],
            2,
        );
        (x, vec![1, 1, 0, 0])
    }

    #[test]
    fn learns_smoothed_log_probabilities() {
        let (x, y) = toy();
        let mut nb = MultinomialNB::new(1.0, true);
        nb.fit(&x, &y).unwrap();

        assert_eq!(nb.classes(), &[0, 1]);
        // class 1: counts great=3, broken=0 -> (3+1)/(3+2), (0+1)/(3+2)
        let flp = nb.feature_log_prob();
        assert!((flp[[1, 0]] - (4.0f64 / 5.0).ln()).abs() < 1e-12);
        assert!((flp[[1, 1]] - (1.0f64 / 5.0).ln()).abs() < 1e-12);
        // class 0: great=1, broken=3
        assert!((flp[[0, 1]] - (4.0f64 / 6.0).ln()).abs() < 1e-12);
        assert!((nb.class_log_prior()[0] - 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn predicts_and_probabilities_agree() {
        let (x, y) = toy();
        let mut nb = MultinomialNB::new(1.0, true);
        nb.fit(&x, &y).unwrap();

        let test = CountMatrix::from_rows(&[vec![(0, 3.0)], vec![(1, 3.0)]], 2);
        assert_eq!(nb.predict(&test).unwrap(), vec![1, 0]);
        let proba = nb.predict_proba(&test).unwrap();
        assert!(proba[0] > 0.5 && proba[0] <= 1.0);
        assert!(proba[1] < 0.5 && proba[1] >= 0.0);
    }

    #[test]
    fn single_class_training_predicts_that_class() {
        let x = CountMatrix::from_rows(&[vec![(0, 1.0)], vec![(1, 1.0)]], 2);
        let mut nb = MultinomialNB::new(1.0, true);
        nb.fit(&x, &[0, 0]).unwrap();
        assert_eq!(nb.predict(&x).unwrap(), vec![0, 0]);
        assert_eq!(nb.predict_proba(&x).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn rejects_empty_and_unfitted() {
        let empty = CountMatrix::from_rows(&[], 3);
        let mut nb = MultinomialNB::new(1.0, true);
        assert!(nb.fit(&empty, &[]).is_err());
        assert!(nb.predict(&empty).is_err());
        let mut negative = MultinomialNB::new(-1.0, true);
        let (x, y) = toy();
        assert!(negative.fit(&x, &y).is_err());
    }
}
