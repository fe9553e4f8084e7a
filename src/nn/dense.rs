use rand::Rng;

use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;
use crate::nn::{Layer, LayerState};

/// Fully connected layer computing `Y = X * W + b`.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    weights: Matrix,
    bias: Matrix,
    state: LayerState,
}

impl DenseLayer {
    /// He-initialized layer seeded from the thread-local generator.
    pub fn new(input_size: usize, output_size: usize) -> Result<DenseLayer> {
        DenseLayer::with_rng(input_size, output_size, &mut rand::thread_rng())
    }

    /// Weights drawn from `N(0, 2 / input_size)`, bias zeroed.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<DenseLayer> {
        if input_size == 0 || output_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "dense layer sizes must be positive, got {input_size}x{output_size}"
            )));
        }
        let std_dev = (2.0 / input_size as f64).sqrt();
        let weights = Matrix::random_normal(input_size, output_size, std_dev, rng)?;
        let bias = Matrix::zeros(1, output_size);

        Ok(DenseLayer {
            weights,
            bias,
            state: LayerState::Ready,
        })
    }

    /// Builds a layer from explicit parameters; `bias` must be `1 x weights.cols()`.
    pub fn from_parts(weights: Matrix, bias: Matrix) -> Result<DenseLayer> {
        if weights.is_empty() {
            return Err(Error::InvalidConfig("dense layer weights are empty".into()));
        }
        if bias.shape() != (1, weights.cols()) {
            return Err(Error::shape((1, weights.cols()), bias.shape()));
        }
        Ok(DenseLayer {
            weights,
            bias,
            state: LayerState::Ready,
        })
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> &Matrix {
        &self.bias
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.cols()
    }

    pub fn state(&self) -> &LayerState {
        &self.state
    }
}

impl Layer for DenseLayer {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let res = self.infer(input)?;
        self.state.record(input);
        Ok(res)
    }

    fn backward(&mut self, grad_output: &Matrix, learning_rate: f64) -> Result<Matrix> {
        let name = self.name();
        let batch = self.state.cached(name)?.rows();
        if grad_output.shape() != (batch, self.output_size()) {
            return Err(Error::shape((batch, self.output_size()), grad_output.shape()));
        }
        let input = self.state.take(name)?;

        let grad_weights = input.transpose().matmul(grad_output)?;
        let grad_bias = grad_output.column_sum();
        let grad_input = grad_output.matmul(&self.weights.transpose())?;

        self.weights.sub_in_place(&grad_weights.scale(learning_rate))?;
        self.bias.sub_in_place(&grad_bias.scale(learning_rate))?;
        Ok(grad_input)
    }

    fn infer(&self, input: &Matrix) -> Result<Matrix> {
        let mut res = input.matmul(&self.weights)?;
        res.add_row_broadcast(&self.bias)?;
        Ok(res)
    }

    fn name(&self) -> &'static str {
        "DenseLayer"
    }

    fn param_count(&self) -> usize {
        self.weights.as_slice().len() + self.bias.as_slice().len()
    }
}
