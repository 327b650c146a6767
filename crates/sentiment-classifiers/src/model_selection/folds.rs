use crate::error::{PipelineError, Result};

/// Stratified k-fold splitter without shuffling.
///
/// Rows of each class are dealt to folds in order so every fold keeps roughly
/// the overall class balance. The allocation matches scikit-learn's
/// `StratifiedKFold(shuffle=False)`.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedKFold {
    n_splits: usize,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(PipelineError::value(format!(
                "k-fold cross-validation requires at least 2 splits, got {}",
                n_splits
            )));
        }
        Ok(Self { n_splits })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// `(train_indices, test_indices)` per fold, both ascending.
    pub fn split(&self, y: &[u8]) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        let n_samples = y.len();
        if self.n_splits > n_samples {
            return Err(PipelineError::value(format!(
                "Cannot have number of splits n_splits={} greater than the number of samples: n_samples={}",
                self.n_splits, n_samples
            )));
        }

        // classes encoded by order of first appearance
        let mut classes: Vec<u8> = Vec::new();
        let encoded: Vec<usize> = y
            .iter()
            .map(|label| match classes.iter().position(|c| c == label) {
                Some(idx) => idx,
                None => {
                    classes.push(*label);
                    classes.len() - 1
                }
            })
            .collect();
        let n_classes = classes.len();

        let mut class_counts = vec![0usize; n_classes];
        for &k in &encoded {
            class_counts[k] += 1;
        }
        if class_counts.iter().all(|&count| self.n_splits > count) {
            return Err(PipelineError::value(format!(
                "n_splits={} cannot be greater than the number of members in each class",
                self.n_splits
            )));
        }
        if let Some(&min_count) = class_counts.iter().min() {
            if self.n_splits > min_count {
                log::warn!(
                    "The least populated class has only {} members, which is less than n_splits={}",
                    min_count,
                    self.n_splits
                );
            }
        }

        // allocation[fold][class]: how many of each class every fold receives
        let mut sorted = encoded.clone();
        sorted.sort_unstable();
        let mut allocation = vec![vec![0usize; n_classes]; self.n_splits];
        for (i, &k) in sorted.iter().enumerate() {
            allocation[i % self.n_splits][k] += 1;
        }

        let mut test_fold = vec![0usize; n_samples];
        for k in 0..n_classes {
            let folds_for_class: Vec<usize> = (0..self.n_splits)
                .flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][k]))
                .collect();
            let members = (0..n_samples).filter(|&i| encoded[i] == k);
            for (idx, fold) in members.zip(folds_for_class) {
                test_fold[idx] = fold;
            }
        }

        Ok((0..self.n_splits)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..n_samples).partition(|&i| test_fold[i] == fold);
                (train, test)
            })
            .collect())
    }
}
