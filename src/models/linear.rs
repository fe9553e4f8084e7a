use std::path::Path;

use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;
use crate::models::persist::{self, Persist};
use crate::models::regularization::{check_training_shapes, LinearParams, RegressionConfig};
use crate::models::{Model, DEFAULT_EPOCHS};
use crate::nn::loss::Mse;

/// Least-squares regression `y = X * w + b` trained by full-batch gradient descent.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    config: RegressionConfig,
    params: LinearParams,
}

impl LinearRegression {
    pub fn new(config: RegressionConfig) -> Self {
        Self {
            config,
            params: LinearParams::default(),
        }
    }

    pub fn config(&self) -> &RegressionConfig {
        &self.config
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    /// Resets the parameters to zero and runs exactly `epochs` descent steps.
    pub fn fit_epochs(&mut self, x: &Matrix, y: &Matrix, epochs: usize) -> Result<()> {
        check_training_shapes(x, y)?;
        self.params = LinearParams::zeros(x.cols());

        for epoch in 0..epochs {
            let predictions = self.params.project(x)?;
            let error = predictions.sub(y)?;
            if log::log_enabled!(log::Level::Debug) && epoch % 100 == 0 {
                log::debug!("linear epoch {epoch}: mse = {:.6}", Mse::loss(&predictions, y)?);
            }
            self.params.descend(x, &error, &self.config)?;
        }
        Ok(())
    }
}

impl Model for LinearRegression {
    fn fit(&mut self, x: &Matrix, y: &Matrix) -> Result<()> {
        self.fit_epochs(x, y, DEFAULT_EPOCHS)
    }

    fn predict(&self, x: &Matrix) -> Result<Matrix> {
        if !self.params.is_fitted() {
            return Err(Error::NotFitted("LinearRegression"));
        }
        self.params.project(x)
    }
}

impl Persist for LinearRegression {
    fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save(
            path.as_ref(),
            "LinearRegression",
            self.config.learning_rate,
            &self.params,
        )
    }

    fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let (alpha, params) = persist::load(path.as_ref(), "LinearRegression")?;
        self.config.learning_rate = alpha;
        self.params = params;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::regularization::Penalty;
    use approx::assert_abs_diff_eq;

    fn line_data() -> (Matrix, Matrix) {
        let xs: Vec<f64> = (0..10).map(|i| i as f64 / 5.0).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        (
            Matrix::from_vec(10, 1, xs).unwrap(),
            Matrix::from_vec(10, 1, ys).unwrap(),
        )
    }

    #[test]
    fn test_converges_on_line() {
        let (x, y) = line_data();
        let mut model = LinearRegression::new(RegressionConfig::default().with_learning_rate(0.1));
        model.fit_epochs(&x, &y, 2000).unwrap();
        assert_abs_diff_eq!(model.params().weights().get(0, 0).unwrap(), 2.0, epsilon = 1e-2);
        assert_abs_diff_eq!(model.params().bias(), 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_l2_shrinks_weights() {
        let (x, y) = line_data();
        let base = RegressionConfig::default().with_learning_rate(0.1);
        let mut plain = LinearRegression::new(base);
        let mut ridge = LinearRegression::new(base.with_penalty(Penalty::L2).with_lambda(5.0));
        plain.fit_epochs(&x, &y, 2000).unwrap();
        ridge.fit_epochs(&x, &y, 2000).unwrap();
        let w_plain = plain.params().weights().get(0, 0).unwrap();
        let w_ridge = ridge.params().weights().get(0, 0).unwrap();
        assert!(w_ridge.abs() < w_plain.abs());
    }

    #[test]
    fn test_fit_runs_default_epochs() {
        let (x, y) = line_data();
        let mut by_default = LinearRegression::default();
        let mut explicit = LinearRegression::default();
        by_default.fit(&x, &y).unwrap();
        explicit.fit_epochs(&x, &y, DEFAULT_EPOCHS).unwrap();
        assert_eq!(DEFAULT_EPOCHS, 100);
        assert_eq!(by_default.params(), explicit.params());
    }

    #[test]
    fn test_refit_starts_from_zero() {
        let (x, y) = line_data();
        let mut once = LinearRegression::default();
        once.fit(&x, &y).unwrap();
        let mut twice = LinearRegression::default();
        twice.fit(&x, &y).unwrap();
        twice.fit(&x, &y).unwrap();
        assert_eq!(twice.params(), once.params());
    }

    #[test]
    fn test_refit_with_more_features() {
        let (x, y) = line_data();
        let mut model = LinearRegression::default();
        model.fit(&x, &y).unwrap();
        assert_eq!(model.params().weights().shape(), (1, 1));

        let wide = Matrix::from_rows(
            &x.as_slice().iter().map(|&v| vec![v, -v]).collect::<Vec<_>>(),
        )
        .unwrap();
        model.fit(&wide, &y).unwrap();
        assert_eq!(model.params().weights().shape(), (2, 1));
        assert!(model.predict(&x).is_err());
    }

    #[test]
    fn test_zero_epochs_leaves_zero_weights() {
        let (x, y) = line_data();
        let mut model = LinearRegression::default();
        model.fit_epochs(&x, &y, 0).unwrap();
        assert_eq!(model.params().weights(), &Matrix::zeros(1, 1));
        assert_eq!(model.predict(&x).unwrap(), Matrix::zeros(10, 1));
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LinearRegression::default();
        assert!(matches!(
            model.predict(&Matrix::zeros(1, 1)),
            Err(Error::NotFitted(_))
        ));
    }

    #[test]
    fn test_fit_rejects_bad_targets() {
        let mut model = LinearRegression::default();
        let x = Matrix::zeros(4, 2);
        assert!(matches!(
            model.fit(&x, &Matrix::zeros(3, 1)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let (x, y) = line_data();
        let mut model = LinearRegression::default();
        model.fit(&x, &y).unwrap();
        assert!(model.predict(&Matrix::zeros(2, 3)).is_err());
    }

    #[test]
    fn test_save_unfitted_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.txt");
        let err = LinearRegression::default().save_model(&path).unwrap_err();
        assert!(matches!(err, Error::NotFitted(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = LinearRegression::default();
        assert!(matches!(
            model.load_model(dir.path().join("absent.txt")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_load_overwrites_alpha() {
        let (x, y) = line_data();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.txt");
        let config = RegressionConfig::default().with_learning_rate(0.05);
        let mut trained = LinearRegression::new(config);
        trained.fit_epochs(&x, &y, 50).unwrap();
        trained.save_model(&path).unwrap();

        let mut restored = LinearRegression::default();
        restored.load_model(&path).unwrap();
        assert_eq!(restored.config().learning_rate, 0.05);
        assert_eq!(restored.params(), trained.params());
    }
}
