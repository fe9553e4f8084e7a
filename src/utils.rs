use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;

fn gather(m: &Matrix, indices: &[usize]) -> Result<Matrix> {
    let mut data = Vec::with_capacity(indices.len() * m.cols());
    for &idx in indices {
        data.extend_from_slice(m.get_row(idx)?.as_slice());
    }
    Matrix::from_vec(indices.len(), m.cols(), data)
}

/// Shuffles rows with a seeded generator and returns
/// `(x_train, x_test, y_train, y_test)`.
///
/// The test split holds `floor(rows * test_size)` rows.
pub fn train_test_split(
    x: &Matrix,
    y: &Matrix,
    test_size: f64,
    seed: u64,
) -> Result<(Matrix, Matrix, Matrix, Matrix)> {
    if !(0.0..=1.0).contains(&test_size) {
        return Err(Error::InvalidConfig(format!(
            "test_size must be within [0, 1], got {test_size}"
        )));
    }
    if x.rows() != y.rows() {
        return Err(Error::shape((x.rows(), y.cols()), y.shape()));
    }

    let total = x.rows();
    let test_rows = (total as f64 * test_size) as usize;
    let mut indices: Vec<usize> = (0..total).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let (train_idx, test_idx) = indices.split_at(total - test_rows);

    Ok((
        gather(x, train_idx)?,
        gather(x, test_idx)?,
        gather(y, train_idx)?,
        gather(y, test_idx)?,
    ))
}
