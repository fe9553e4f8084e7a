use crate::core::error::Result;
use crate::core::matrix::Matrix;

pub mod knn;
pub mod linear;
pub mod logistic;
pub mod persist;
pub mod regularization;

/// Epoch count used by [`Model::fit`].
pub const DEFAULT_EPOCHS: usize = 100;

/// Supervised model trained on `(n_samples, n_features)` inputs and
/// `(n_samples, n_targets)` targets.
pub trait Model {
    fn fit(&mut self, x: &Matrix, y: &Matrix) -> Result<()>;

    fn predict(&self, x: &Matrix) -> Result<Matrix>;
}
