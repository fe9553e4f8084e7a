//! Dense matrix engine and a small family of gradient-trained models.

pub mod core;
pub mod metrics;
pub mod models;
pub mod nn;
pub mod preprocessing;
pub mod utils;

pub use crate::core::error::{Error, Result};
pub use crate::core::matrix::Matrix;
pub use crate::models::knn::Knn;
pub use crate::models::linear::LinearRegression;
pub use crate::models::logistic::LogisticRegression;
pub use crate::models::persist::Persist;
pub use crate::models::regularization::{Penalty, RegressionConfig};
pub use crate::models::Model;
pub use crate::nn::dense::DenseLayer;
pub use crate::nn::network::NeuralNetwork;
pub use crate::nn::Layer;
