use sprs::{CsMat, TriMat};

use crate::error::{PipelineError, Result};

/// Document-term matrix: one row per document, one column per vocabulary term.
#[derive(Clone, Debug, PartialEq)]
pub struct CountMatrix {
    inner: CsMat<f64>,
}

impl CountMatrix {
    /// Build from per-row `(column, value)` entries. Entries for the same
    /// column within a row are summed.
    pub fn from_rows(rows: &[Vec<(usize, f64)>], n_features: usize) -> Self {
        let mut tri = TriMat::new((rows.len(), n_features));
        for (r, row) in rows.iter().enumerate() {
            for &(c, v) in row {
                assert!(c < n_features, "column index {} out of bounds", c);
                tri.add_triplet(r, c, v);
            }
        }
        Self {
            inner: tri.to_csr(),
        }
    }

    /// Like `from_rows`, but an out-of-range column is a `Value` error.
    pub fn try_from_rows(rows: &[Vec<(usize, f64)>], n_features: usize) -> Result<Self> {
        for (r, row) in rows.iter().enumerate() {
            if let Some(&(c, _)) = row.iter().find(|(c, _)| *c >= n_features) {
                return Err(PipelineError::value(format!(
                    "Row {} references column {} but the matrix has {} columns",
                    r, c, n_features
                )));
            }
        }
        Ok(Self::from_rows(rows, n_features))
    }

    pub fn nrows(&self) -> usize {
        self.inner.rows()
    }

    pub fn ncols(&self) -> usize {
        self.inner.cols()
    }

    pub fn nnz(&self) -> usize {
        self.inner.nnz()
    }

    /// Non-zero `(column, value)` pairs of each row, in row order.
    pub fn row_entries(&self) -> Vec<Vec<(usize, f64)>> {
        self.inner
            .outer_iterator()
            .map(|row| row.iter().map(|(c, &v)| (c, v)).collect())
            .collect()
    }

    /// Visit each row as parallel `(columns, values)` slices.
    pub fn for_each_row<F>(&self, mut f: F)
    where
        F: FnMut(usize, &[usize], &[f64]),
    {
        for (r, row) in self.inner.outer_iterator().enumerate() {
            f(r, row.indices(), row.data());
        }
    }

    /// Dense value at `(row, col)`; zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.inner.get(row, col).copied().unwrap_or(0.0)
    }
}
