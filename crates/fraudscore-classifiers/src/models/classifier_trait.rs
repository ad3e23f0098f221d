use crate::error::PredictError;
use crate::math::Array2;

/// A pre-fit binary classifier. Implementations are read-only after
/// construction and are shared across server workers.
pub trait ClassifierModel: Send + Sync {
    /// Score every row of `x`. For probabilistic backends each score is the
    /// probability of the positive class.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f32>, PredictError>;

    /// Feature count recorded in the artifact itself, if any.
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
