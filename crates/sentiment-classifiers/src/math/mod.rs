//! Matrix types used throughout the crate.
//!
//! Document-term counts are mostly zeros, so they live in a CSR matrix
//! (`CountMatrix`) built on `sprs`.
pub mod sparse;

pub use sparse::CountMatrix;
