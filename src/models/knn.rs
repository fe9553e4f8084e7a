use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;
use crate::models::Model;

/// Brute-force k-nearest-neighbours classifier.
///
/// `fit` only stores the training set; every prediction scans all of it.
#[derive(Debug, Clone)]
pub struct Knn {
    k: usize,
    train_x: Matrix,
    train_y: Matrix,
}

impl Default for Knn {
    fn default() -> Self {
        Self {
            k: 3,
            train_x: Matrix::default(),
            train_y: Matrix::default(),
        }
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

impl Knn {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidConfig("k must be at least 1".into()));
        }
        Ok(Self {
            k,
            ..Self::default()
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn n_samples(&self) -> usize {
        self.train_x.rows()
    }

    /// Majority label among the `k` rows closest to `query`.
    ///
    /// Equal votes go to the smallest label.
    fn vote(&self, query: &[f64]) -> f64 {
        let mut distances: Vec<(f64, usize)> = self
            .train_x
            .row_iter()
            .enumerate()
            .map(|(idx, row)| (euclidean(query, row), idx))
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let labels = self.train_y.as_slice();
        let mut nearest: Vec<f64> = distances[..self.k]
            .iter()
            .map(|&(_, idx)| labels[idx])
            .collect();
        nearest.sort_by(f64::total_cmp);

        let mut best = (nearest[0], 0usize);
        let mut run = (nearest[0], 0usize);
        for label in nearest {
            if label == run.0 {
                run.1 += 1;
            } else {
                run = (label, 1);
            }
            if run.1 > best.1 {
                best = run;
            }
        }
        best.0
    }
}

impl Model for Knn {
    fn fit(&mut self, x: &Matrix, y: &Matrix) -> Result<()> {
        if x.cols() == 0 {
            return Err(Error::Usage("KNN needs at least one feature column".into()));
        }
        if y.shape() != (x.rows(), 1) {
            return Err(Error::shape((x.rows(), 1), y.shape()));
        }
        self.train_x = x.clone();
        self.train_y = y.clone();
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Matrix> {
        if self.train_x.rows() == 0 {
            return Err(Error::NotFitted("Knn"));
        }
        if self.k > self.train_x.rows() {
            return Err(Error::InvalidConfig(format!(
                "k = {} exceeds the {} training samples",
                self.k,
                self.train_x.rows()
            )));
        }
        if x.cols() != self.train_x.cols() {
            return Err(Error::shape((x.rows(), self.train_x.cols()), x.shape()));
        }

        let predictions = x.row_iter().map(|row| self.vote(row)).collect();
        Matrix::from_vec(x.rows(), 1, predictions)
    }
}
