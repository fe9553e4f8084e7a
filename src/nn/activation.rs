use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;
use crate::nn::{Layer, LayerState};

/// Logistic function `1 / (1 + e^-z)`.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[derive(Debug, Clone, Default)]
pub struct ReLU {
    state: LayerState,
}

#[derive(Debug, Clone, Default)]
pub struct Sigmoid {
    state: LayerState,
}

impl ReLU {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sigmoid {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_grad(input: &Matrix, grad_output: &Matrix) -> Result<()> {
    if input.shape() != grad_output.shape() {
        return Err(Error::shape(input.shape(), grad_output.shape()));
    }
    Ok(())
}

impl Layer for ReLU {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        self.state.record(input);
        self.infer(input)
    }

    fn backward(&mut self, grad_output: &Matrix, _learning_rate: f64) -> Result<Matrix> {
        let name = self.name();
        check_grad(self.state.cached(name)?, grad_output)?;
        let input = self.state.take(name)?;
        input.zip_map(grad_output, |x, g| if x > 0.0 { g } else { 0.0 })
    }

    fn infer(&self, input: &Matrix) -> Result<Matrix> {
        Ok(input.map(|x| if x > 0.0 { x } else { 0.0 }))
    }

    fn name(&self) -> &'static str {
        "ReLU"
    }
}

impl Layer for Sigmoid {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        self.state.record(input);
        self.infer(input)
    }

    fn backward(&mut self, grad_output: &Matrix, _learning_rate: f64) -> Result<Matrix> {
        let name = self.name();
        check_grad(self.state.cached(name)?, grad_output)?;
        let input = self.state.take(name)?;
        input.zip_map(grad_output, |x, g| {
            let s = sigmoid(x);
            g * s * (1.0 - s)
        })
    }

    fn infer(&self, input: &Matrix) -> Result<Matrix> {
        Ok(input.map(sigmoid))
    }

    fn name(&self) -> &'static str {
        "Sigmoid"
    }
}
