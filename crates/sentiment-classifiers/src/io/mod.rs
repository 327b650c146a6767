//! IO utilities for loading review tables.

pub mod reviews_csv;

pub use reviews_csv::{derive_label, load_reviews, normalize_column_name, LoaderConfig};
