use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;

pub mod activation;
pub mod dense;
pub mod loss;
pub mod network;

/// A differentiable stage of a [`network::NeuralNetwork`].
///
/// `forward` remembers its input; the next `backward` consumes it, updates any
/// trainable parameters and returns the gradient for the preceding layer.
pub trait Layer {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix>;

    fn backward(&mut self, grad_output: &Matrix, learning_rate: f64) -> Result<Matrix>;

    /// Same output as `forward`, without caching anything.
    fn infer(&self, input: &Matrix) -> Result<Matrix>;

    fn name(&self) -> &'static str;

    fn param_count(&self) -> usize {
        0
    }
}

fn missing_forward(layer: &str) -> Error {
    Error::Usage(format!("{layer}: backward called without a preceding forward"))
}

/// Input cache shared by every layer implementation.
#[derive(Debug, Clone, Default)]
pub enum LayerState {
    #[default]
    Ready,
    AwaitingBackward(Matrix),
}

impl LayerState {
    pub fn record(&mut self, input: &Matrix) {
        *self = LayerState::AwaitingBackward(input.clone());
    }

    /// Borrows the cached input without leaving `AwaitingBackward`.
    pub fn cached(&self, layer: &str) -> Result<&Matrix> {
        match self {
            LayerState::AwaitingBackward(input) => Ok(input),
            LayerState::Ready => Err(missing_forward(layer)),
        }
    }

    /// Hands back the cached input and resets to `Ready`.
    pub fn take(&mut self, layer: &str) -> Result<Matrix> {
        match std::mem::take(self) {
            LayerState::AwaitingBackward(input) => Ok(input),
            LayerState::Ready => Err(missing_forward(layer)),
        }
    }

    pub fn is_awaiting_backward(&self) -> bool {
        matches!(self, LayerState::AwaitingBackward(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_keeps_state() {
        let mut state = LayerState::default();
        assert!(matches!(state.cached("ReLU"), Err(Error::Usage(_))));
        state.record(&Matrix::zeros(2, 3));
        assert_eq!(state.cached("Dense").unwrap().shape(), (2, 3));
        assert!(state.is_awaiting_backward());
        assert_eq!(state.take("Dense").unwrap().shape(), (2, 3));
        assert!(!state.is_awaiting_backward());
    }

    #[test]
    fn test_usage_error_names_layer() {
        let err = LayerState::Ready.take("Sigmoid").unwrap_err();
        assert!(err.to_string().contains("Sigmoid"));
    }
}
