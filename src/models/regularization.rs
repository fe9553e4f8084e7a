use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;

/// Weight penalty added to the gradient of the regression models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Penalty {
    #[default]
    None,
    L1,
    L2,
}

impl Penalty {
    /// Gradient contribution of the penalty for a single weight.
    pub fn gradient(self, weight: f64, lambda: f64) -> f64 {
        match self {
            Penalty::None => 0.0,
            Penalty::L2 => lambda * weight,
            Penalty::L1 => {
                if weight > 0.0 {
                    lambda
                } else if weight < 0.0 {
                    -lambda
                } else {
                    0.0
                }
            }
        }
    }
}

impl FromStr for Penalty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Penalty::None),
            "l1" => Ok(Penalty::L1),
            "l2" => Ok(Penalty::L2),
            other => Err(Error::InvalidConfig(format!(
                "unknown penalty {other:?}, expected one of none, l1, l2"
            ))),
        }
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Penalty::None => "none",
            Penalty::L1 => "l1",
            Penalty::L2 => "l2",
        };
        f.write_str(s)
    }
}

/// Hyperparameters shared by linear and logistic regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionConfig {
    pub learning_rate: f64,
    pub reg_lambda: f64,
    pub penalty: Penalty,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            reg_lambda: 0.01,
            penalty: Penalty::None,
        }
    }
}

impl RegressionConfig {
    pub fn new(learning_rate: f64, reg_lambda: f64, penalty: Penalty) -> Self {
        Self {
            learning_rate,
            reg_lambda,
            penalty,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_lambda(mut self, reg_lambda: f64) -> Self {
        self.reg_lambda = reg_lambda;
        self
    }

    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }
}

/// Weight column and scalar intercept of a linear predictor.
///
/// Both are `(0, 0)` until the first fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearParams {
    pub(crate) weights: Matrix,
    pub(crate) bias: Matrix,
}

impl LinearParams {
    pub(crate) fn zeros(features: usize) -> Self {
        Self {
            weights: Matrix::zeros(features, 1),
            bias: Matrix::zeros(1, 1),
        }
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias.as_slice().first().copied().unwrap_or(0.0)
    }

    pub fn is_fitted(&self) -> bool {
        !self.weights.is_empty()
    }

    /// `X * w + b`, with `b` added to every row.
    pub(crate) fn project(&self, x: &Matrix) -> Result<Matrix> {
        let bias = self.bias();
        Ok(x.matmul(&self.weights)?.map(|v| v + bias))
    }

    /// One regularized gradient-descent step given `error = prediction - y`.
    pub(crate) fn descend(
        &mut self,
        x: &Matrix,
        error: &Matrix,
        config: &RegressionConfig,
    ) -> Result<()> {
        let step = config.learning_rate / x.rows() as f64;
        let grad_weights = x.transpose().matmul(error)?;

        let updated = self.weights.zip_map(&grad_weights, |w, g| {
            w - step * (g + config.penalty.gradient(w, config.reg_lambda))
        })?;
        self.weights = updated;

        let bias = self.bias() - step * error.sum();
        self.bias.set(0, 0, bias)?;
        Ok(())
    }
}

/// Checks the `(m, f)` / `(m, 1)` shape contract of a regression fit.
pub(crate) fn check_training_shapes(x: &Matrix, y: &Matrix) -> Result<()> {
    if x.rows() == 0 || x.cols() == 0 {
        return Err(Error::Usage("cannot fit on an empty feature matrix".into()));
    }
    if y.shape() != (x.rows(), 1) {
        return Err(Error::shape((x.rows(), 1), y.shape()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_penalty() {
        assert_eq!("none".parse::<Penalty>().unwrap(), Penalty::None);
        assert_eq!("L1".parse::<Penalty>().unwrap(), Penalty::L1);
        assert_eq!(" l2 ".parse::<Penalty>().unwrap(), Penalty::L2);
        assert!(matches!(
            "elastic".parse::<Penalty>(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_penalty_gradient() {
        assert_eq!(Penalty::None.gradient(3.0, 0.5), 0.0);
        assert_eq!(Penalty::L2.gradient(3.0, 0.5), 1.5);
        assert_eq!(Penalty::L1.gradient(3.0, 0.5), 0.5);
        assert_eq!(Penalty::L1.gradient(-3.0, 0.5), -0.5);
        assert_eq!(Penalty::L1.gradient(0.0, 0.5), 0.0);
    }

    #[test]
    fn test_descend_single_step() {
        let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
        let mut params = LinearParams::zeros(1);
        let error = Matrix::from_vec(2, 1, vec![-3.0, -5.0]).unwrap();
        let config = RegressionConfig::default().with_learning_rate(0.1);
        params.descend(&x, &error, &config).unwrap();
        // gradW = 1*-3 + 2*-5 = -13; step = 0.05
        assert!((params.weights().get(0, 0).unwrap() - 0.65).abs() < 1e-12);
        assert!((params.bias() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_training_shape_checks() {
        let x = Matrix::<f64>::zeros(3, 2);
        assert!(check_training_shapes(&x, &Matrix::zeros(3, 1)).is_ok());
        assert!(check_training_shapes(&x, &Matrix::zeros(2, 1)).is_err());
        assert!(check_training_shapes(&Matrix::zeros(0, 2), &Matrix::zeros(0, 1)).is_err());
    }
}
