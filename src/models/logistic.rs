use std::path::Path;

use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;
use crate::models::persist::{self, Persist};
use crate::models::regularization::{check_training_shapes, LinearParams, RegressionConfig};
use crate::models::{Model, DEFAULT_EPOCHS};
use crate::nn::activation::sigmoid;

/// Probability at or above which [`LogisticRegression::predict`] answers `1.0`.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Binary classifier `p = sigmoid(X * w + b)` trained on log-loss.
///
/// Targets are expected to be `0.0` / `1.0`.
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: RegressionConfig,
    params: LinearParams,
}

fn log_loss(proba: &Matrix, y: &Matrix) -> f64 {
    const EPS: f64 = 1e-12;
    let n = proba.rows().max(1) as f64;
    proba
        .as_slice()
        .iter()
        .zip(y.as_slice())
        .map(|(&p, &t)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum::<f64>()
        / n
}

impl LogisticRegression {
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

    /// Positive-class probability for every row of `x`.
    pub fn predict_proba(&self, x: &Matrix) -> Result<Matrix> {
        if !self.params.is_fitted() {
            return Err(Error::NotFitted("LogisticRegression"));
        }
        Ok(self.params.project(x)?.map(sigmoid))
    }

    pub fn fit_epochs(&mut self, x: &Matrix, y: &Matrix, epochs: usize) -> Result<()> {
        check_training_shapes(x, y)?;
        self.params = LinearParams::zeros(x.cols());

        for epoch in 0..epochs {
            // proba - y is the log-loss gradient w.r.t. the logits
            let proba = self.params.project(x)?.map(sigmoid);
            let error = proba.sub(y)?;
            if log::log_enabled!(log::Level::Debug) && epoch % 100 == 0 {
                log::debug!("logistic epoch {epoch}: log-loss = {:.6}", log_loss(&proba, y));
            }
            self.params.descend(x, &error, &self.config)?;
        }
        Ok(())
    }
}

impl Model for LogisticRegression {
    fn fit(&mut self, x: &Matrix, y: &Matrix) -> Result<()> {
        self.fit_epochs(x, y, DEFAULT_EPOCHS)
    }

    fn predict(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self
            .predict_proba(x)?
            .map(|p| if p >= DECISION_THRESHOLD { 1.0 } else { 0.0 }))
    }
}

impl Persist for LogisticRegression {
    fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save(
            path.as_ref(),
            "LogisticRegression",
            self.config.learning_rate,
            &self.params,
        )
    }

    fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let (alpha, params) = persist::load(path.as_ref(), "LogisticRegression")?;
        self.config.learning_rate = alpha;
        self.params = params;
        Ok(())
    }
}
