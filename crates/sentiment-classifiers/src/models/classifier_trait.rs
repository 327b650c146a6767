use crate::error::Result;
use crate::math::CountMatrix;

/// Contract for the `classifier` stage of the text pipeline.
///
/// Labels use the crate convention: 1 for positive reviews, 0 otherwise.
pub trait ClassifierModel: Send + Sync {
    /// Fit the model on a document-term matrix.
    fn fit(&mut self, x: &CountMatrix, y: &[u8]) -> Result<()>;

    /// Predict a label per row.
    fn predict(&self, x: &CountMatrix) -> Result<Vec<u8>>;

    /// Probability of the positive class per row.
    fn predict_proba(&self, x: &CountMatrix) -> Result<Vec<f64>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str { "classifier" }
}
