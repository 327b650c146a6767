//! Delimited review table reader.
use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data_handling::ReviewTable;
use crate::error::{PipelineError, Result};

/// Configuration for reading a review table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Field delimiter (single ASCII character).
    pub delimiter: char,
    /// Column holding the numeric rating.
    pub rating_column: String,
    /// Column the derived 0/1 label is written to. When it equals
    /// `rating_column` the rating is replaced in place.
    pub label_column: String,
    /// Ratings at or above this value are labelled 1.
    pub positive_min: f64,
    /// Ratings at or below this value are labelled 0.
    pub negative_max: f64,
    /// Cell values treated as missing, in addition to the empty string.
    pub na_values: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            rating_column: "Ratings".to_string(),
            label_column: "Ratings".to_string(),
            positive_min: 4.0,
            negative_max: 3.0,
            na_values: [
                "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
                "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Strip surrounding whitespace and replace inner spaces with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Binary sentiment label for a rating cell.
///
/// Returns `None` when the rating is not a number or falls in neither band
/// (strictly between `negative_max` and `positive_min`); such rows are
/// dropped with the other incomplete rows.
pub fn derive_label(rating: &str, positive_min: f64, negative_max: f64) -> Option<u8> {
    let value = rating.trim().parse::<f64>().ok()?;
    if value >= positive_min {
        Some(1)
    } else if value <= negative_max {
        Some(0)
    } else {
        None
    }
}

/// Read a review table, normalize its header and derive the label column.
///
/// Rows with any missing cell (empty, an NA token, or an underivable label)
/// are removed; the remaining rows keep file order.
pub fn load_reviews<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<ReviewTable> {
    let path = path.as_ref();
    if !config.delimiter.is_ascii() {
        return Err(PipelineError::value(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            config.delimiter
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;

    let mut columns: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::csv(path, e))?
        .iter()
        .map(normalize_column_name)
        .collect();

    let rating_name = normalize_column_name(&config.rating_column);
    let label_name = normalize_column_name(&config.label_column);

    let rating_idx = columns
        .iter()
        .position(|c| *c == rating_name)
        .ok_or_else(|| {
            PipelineError::schema(format!(
                "Missing rating column '{}' in {}. Available columns: {}",
                rating_name,
                path.display(),
                columns.join(", ")
            ))
        })?;

    let label_idx = match columns.iter().position(|c| *c == label_name) {
        Some(idx) => idx,
        None => {
            columns.push(label_name.clone());
            columns.len() - 1
        }
    };

    let na_values: HashSet<&str> = config.na_values.iter().map(String::as_str).collect();
    let is_missing = |cell: &str| cell.is_empty() || na_values.contains(cell);

    let mut rows = Vec::new();
    let mut n_read = 0usize;
    let mut n_unlabelled = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| PipelineError::csv(path, e))?;
        n_read += 1;

        let mut cells: Vec<Option<String>> = record
            .iter()
            .map(|cell| {
                if is_missing(cell) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        if label_idx == cells.len() {
            cells.push(None);
        }

        let label = cells[rating_idx]
            .as_deref()
            .and_then(|r| derive_label(r, config.positive_min, config.negative_max));
        if label.is_none() {
            n_unlabelled += 1;
            log::trace!("Row {} has no derivable label", row_idx + 1);
        }
        cells[label_idx] = label.map(|l| l.to_string());

        if let Some(row) = cells.into_iter().collect::<Option<Vec<String>>>() {
            rows.push(row);
        }
    }

    log::debug!(
        "Read {} rows from {}; dropped {} incomplete rows ({} without a label)",
        n_read,
        path.display(),
        n_read - rows.len(),
        n_unlabelled
    );

    ReviewTable::new(columns, rows)
}
