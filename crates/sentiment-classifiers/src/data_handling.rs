//! In-memory review tables and the helpers that turn them into training data.
//!
//! `ReviewTable` is what the loader produces, `FeatureSet` is the (text, label)
//! projection used for training, and `Split` holds the train/holdout partition.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{PipelineError, Result};

/// Row-major table of string cells with normalized column names.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReviewTable {
    /// Build a table; every row must have one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(PipelineError::schema(format!(
                "Row {} has {} cells but the table has {} columns",
                idx,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Borrow one column in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name).ok_or_else(|| {
            PipelineError::schema(format!(
                "Column '{}' not found. Available columns: {}",
                name,
                self.columns.join(", ")
            ))
        })?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    pub fn log_summary(&self) {
        log::info!(
            "Loaded review table with {} rows and {} columns ({})",
            self.nrows(),
            self.ncols(),
            self.columns.join(", ")
        );
    }
}

/// Texts and their binary labels, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    pub x: Vec<String>,
    pub y: Vec<u8>,
}

impl FeatureSet {
    pub fn new(x: Vec<String>, y: Vec<u8>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(PipelineError::value(format!(
                "Inputs and labels must have equal length ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn n_positive(&self) -> usize {
        self.y.iter().filter(|&&v| v == 1).count()
    }

    /// Rows at `indices`, in the order given.
    pub fn select(&self, indices: &[usize]) -> FeatureSet {
        FeatureSet {
            x: indices.iter().map(|&i| self.x[i].clone()).collect(),
            y: indices.iter().map(|&i| self.y[i]).collect(),
        }
    }
}

/// Train/holdout partition of a `FeatureSet`.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub x_train: Vec<String>,
    pub x_test: Vec<String>,
    pub y_train: Vec<u8>,
    pub y_test: Vec<u8>,
    /// Original row index of every training row.
    pub train_indices: Vec<usize>,
    /// Original row index of every holdout row.
    pub test_indices: Vec<usize>,
}

impl Split {
    pub fn train(&self) -> FeatureSet {
        FeatureSet {
            x: self.x_train.clone(),
            y: self.y_train.clone(),
        }
    }

    pub fn test(&self) -> FeatureSet {
        FeatureSet {
            x: self.x_test.clone(),
            y: self.y_test.clone(),
        }
    }
}

/// Project the input text column and the binary output column.
pub fn input_output(table: &ReviewTable, input: &str, output: &str) -> Result<FeatureSet> {
    let x = table
        .column(input)?
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let y = table
        .column(output)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value.trim() {
            "1" => Ok(1u8),
            "0" => Ok(0u8),
            other => Err(PipelineError::schema(format!(
                "Column '{}' must hold binary labels, found '{}' at row {}",
                output, other, row
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    FeatureSet::new(x, y)
}

/// Shuffle-split into train and holdout parts.
///
/// The holdout size is `ceil(test_size * n)`. The same `random_state` and the
/// same input order always produce the same partition.
///
/// # Arguments
///
/// * `data` - The rows to partition.
/// * `test_size` - Fraction of rows that go to the holdout set, in (0, 1).
/// * `random_state` - Seed for the row permutation.
pub fn train_test_split(data: &FeatureSet, test_size: f64, random_state: u64) -> Result<Split> {
    if !test_size.is_finite() || test_size <= 0.0 || test_size >= 1.0 {
        return Err(PipelineError::value(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    if data.x.len() != data.y.len() {
        return Err(PipelineError::value(format!(
            "Inputs and labels must have equal length ({} vs {})",
            data.x.len(),
            data.y.len()
        )));
    }

    let n_samples = data.len();
    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    let empty = if n_test == 0 {
        Some("test")
    } else if n_train == 0 {
        Some("train")
    } else {
        None
    };
    if let Some(partition) = empty {
        return Err(PipelineError::value(format!(
            "With n_samples={}, test_size={} the resulting {} set would be empty",
            n_samples, test_size, partition
        )));
    }

    let mut rng = StdRng::seed_from_u64(random_state);
    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(&mut rng);

    let test_indices = indices[..n_test].to_vec();
    let train_indices = indices[n_test..].to_vec();

    let train = data.select(&train_indices);
    let test = data.select(&test_indices);

    log::debug!(
        "Split {} rows into {} train ({} positive) and {} test ({} positive)",
        n_samples,
        train.len(),
        train.n_positive(),
        test.len(),
        test.n_positive()
    );

    Ok(Split {
        x_train: train.x,
        x_test: test.x,
        y_train: train.y,
        y_test: test.y,
        train_indices,
        test_indices,
    })
}
