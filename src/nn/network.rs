use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;
use crate::models::{Model, DEFAULT_EPOCHS};
use crate::nn::loss::Mse;
use crate::nn::Layer;

/// Ordered stack of layers trained full-batch on mean squared error.
pub struct NeuralNetwork {
    layers: Vec<Box<dyn Layer>>,
    learning_rate: f64,
}

impl Default for NeuralNetwork {
    fn default() -> Self {
        NeuralNetwork::new(0.01)
    }
}

impl NeuralNetwork {
    pub fn new(learning_rate: f64) -> NeuralNetwork {
        NeuralNetwork {
            layers: Vec::new(),
            learning_rate,
        }
    }

    /// Appends `layer` after the current last layer.
    pub fn add(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn with_layer<L: Layer + 'static>(mut self, layer: L) -> NeuralNetwork {
        self.add(Box::new(layer));
        self
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn param_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.param_count()).sum()
    }

    /// Forward pass that leaves every layer waiting for its backward call.
    fn forward(&mut self, x: &Matrix) -> Result<Matrix> {
        let mut current = x.clone();
        for layer in self.layers.iter_mut() {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix> {
        let mut current_grad = grad_output.clone();
        for layer in self.layers.iter_mut().rev() {
            current_grad = layer.backward(&current_grad, self.learning_rate)?;
        }
        Ok(current_grad)
    }

    /// Runs exactly `epochs` full-batch forward/backward passes.
    pub fn fit_epochs(&mut self, x: &Matrix, y: &Matrix, epochs: usize) -> Result<()> {
        if x.rows() != y.rows() {
            return Err(Error::shape((x.rows(), y.cols()), y.shape()));
        }
        if x.rows() == 0 {
            return Err(Error::Usage("cannot fit on an empty batch".into()));
        }

        for epoch in 0..epochs {
            let output = self.forward(x)?;
            let grad = Mse::grad(&output, y)?;
            if log::log_enabled!(log::Level::Debug) && epoch % 100 == 0 {
                log::debug!("network epoch {epoch}: mse = {:.6}", Mse::loss(&output, y)?);
            }
            self.backward(&grad)?;
        }
        Ok(())
    }
}

impl Model for NeuralNetwork {
    fn fit(&mut self, x: &Matrix, y: &Matrix) -> Result<()> {
        self.fit_epochs(x, y, DEFAULT_EPOCHS)
    }

    fn predict(&self, x: &Matrix) -> Result<Matrix> {
        self.layers
            .iter()
            .try_fold(x.clone(), |current, layer| layer.infer(&current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::activation::{ReLU, Sigmoid};
    use crate::nn::dense::DenseLayer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line_data() -> (Matrix, Matrix) {
        let xs: Vec<f64> = (0..10).map(|i| i as f64 / 5.0).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        (
            Matrix::from_vec(10, 1, xs).unwrap(),
            Matrix::from_vec(10, 1, ys).unwrap(),
        )
    }

    #[test]
    fn test_empty_network_is_identity() {
        let net = NeuralNetwork::default();
        let x = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(net.is_empty());
        assert_eq!(net.predict(&x).unwrap(), x);
    }

    #[test]
    fn test_predict_chains_layers() {
        let first = DenseLayer::from_parts(
            Matrix::from_vec(1, 2, vec![1.0, -1.0]).unwrap(),
            Matrix::zeros(1, 2),
        )
        .unwrap();
        let second = DenseLayer::from_parts(
            Matrix::from_vec(2, 1, vec![1.0, 1.0]).unwrap(),
            Matrix::from_vec(1, 1, vec![0.5]).unwrap(),
        )
        .unwrap();
        let net = NeuralNetwork::new(0.1)
            .with_layer(first)
            .with_layer(ReLU::new())
            .with_layer(second);
        let x = Matrix::from_vec(2, 1, vec![2.0, -3.0]).unwrap();
        // relu([2, -2]) = [2, 0] -> 2.5 ; relu([-3, 3]) = [0, 3] -> 3.5
        assert_eq!(
            net.predict(&x).unwrap(),
            Matrix::from_vec(2, 1, vec![2.5, 3.5]).unwrap()
        );
        assert_eq!(net.len(), 3);
        assert_eq!(net.param_count(), 4 + 3);
    }

    #[test]
    fn test_single_dense_learns_line() {
        let (x, y) = line_data();
        let mut rng = StdRng::seed_from_u64(3);
        let layer = DenseLayer::with_rng(1, 1, &mut rng).unwrap();
        let mut net = NeuralNetwork::new(0.05).with_layer(layer);
        net.fit_epochs(&x, &y, 3000).unwrap();
        let pred = net.predict(&x).unwrap();
        assert!(Mse::loss(&pred, &y).unwrap() < 1e-6);
    }

    #[test]
    fn test_hidden_layer_reduces_loss() {
        let (x, y) = line_data();
        let mut rng = StdRng::seed_from_u64(11);
        let mut net = NeuralNetwork::new(0.01)
            .with_layer(DenseLayer::with_rng(1, 8, &mut rng).unwrap())
            .with_layer(Sigmoid::new())
            .with_layer(DenseLayer::with_rng(8, 1, &mut rng).unwrap());
        let before = Mse::loss(&net.predict(&x).unwrap(), &y).unwrap();
        net.fit_epochs(&x, &y, 500).unwrap();
        let after = Mse::loss(&net.predict(&x).unwrap(), &y).unwrap();
        assert!(after < before);
    }

    #[test]
    fn test_fit_runs_default_epochs() {
        let (x, y) = line_data();
        let build = || {
            let mut rng = StdRng::seed_from_u64(5);
            NeuralNetwork::new(0.01).with_layer(DenseLayer::with_rng(1, 1, &mut rng).unwrap())
        };
        let mut by_default = build();
        let mut explicit = build();
        by_default.fit(&x, &y).unwrap();
        explicit.fit_epochs(&x, &y, DEFAULT_EPOCHS).unwrap();
        assert_eq!(by_default.predict(&x).unwrap(), explicit.predict(&x).unwrap());
    }

    #[test]
    fn test_fit_rejects_row_mismatch() {
        let mut net = NeuralNetwork::default().with_layer(DenseLayer::new(1, 1).unwrap());
        assert!(matches!(
            net.fit(&Matrix::zeros(3, 1), &Matrix::zeros(2, 1)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_fit_rejects_wrong_input_width() {
        let mut net = NeuralNetwork::default().with_layer(DenseLayer::new(2, 1).unwrap());
        assert!(net.fit(&Matrix::zeros(3, 1), &Matrix::zeros(3, 1)).is_err());
    }
}
