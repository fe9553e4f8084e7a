use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;

/// Mean squared error.
pub struct Mse;

impl Mse {
    /// Mean of the squared cell differences.
    pub fn loss(prediction: &Matrix, target: &Matrix) -> Result<f64> {
        if prediction.shape() != target.shape() {
            return Err(Error::shape(target.shape(), prediction.shape()));
        }
        let n = prediction.as_slice().len().max(1) as f64;
        let s = prediction
            .as_slice()
            .iter()
            .zip(target.as_slice())
            .fold(0.0, |acc, (pred, targ)| acc + (pred - targ) * (pred - targ));
        Ok(s / n)
    }

    /// Derivative w.r.t. `prediction`: `(prediction - target) * 2 / batch_size`.
    pub fn grad(prediction: &Matrix, target: &Matrix) -> Result<Matrix> {
        let batch = prediction.rows().max(1) as f64;
        Ok(prediction.sub(target)? * (2.0 / batch))
    }
}
