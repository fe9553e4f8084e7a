use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;

/// Per-column standardization `z = (x - mean) / std`.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    means: Vec<f64>,
    std_devs: Vec<f64>,
    fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    /// Learns population mean and standard deviation of every column.
    ///
    /// Constant columns get a standard deviation of 1.
    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if x.rows() == 0 {
            return Err(Error::Usage("cannot fit a scaler on zero rows".into()));
        }
        let n = x.rows() as f64;
        self.means = x.column_sum().as_slice().iter().map(|s| s / n).collect();

        let mut variance = vec![0.0; x.cols()];
        for row in x.row_iter() {
            for ((acc, v), mean) in variance.iter_mut().zip(row).zip(&self.means) {
                *acc += (v - mean) * (v - mean);
            }
        }
        self.std_devs = variance
            .into_iter()
            .map(|v| {
                let sd = (v / n).sqrt();
                if sd == 0.0 {
                    1.0
                } else {
                    sd
                }
            })
            .collect();
        self.fitted = true;
        Ok(())
    }

    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        if !self.fitted {
            return Err(Error::NotFitted("StandardScaler"));
        }
        if x.cols() != self.means.len() {
            return Err(Error::shape((x.rows(), self.means.len()), x.shape()));
        }
        let mut data = Vec::with_capacity(x.as_slice().len());
        for row in x.row_iter() {
            for ((v, mean), sd) in row.iter().zip(&self.means).zip(&self.std_devs) {
                data.push((v - mean) / sd);
            }
        }
        Matrix::from_vec(x.rows(), x.cols(), data)
    }

    pub fn fit_transform(&mut self, x: &Matrix) -> Result<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_standardizes_columns() {
        let x = Matrix::from_rows(&[vec![1.0, 5.0], vec![3.0, 5.0]]).unwrap();
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&x).unwrap();
        assert_eq!(scaler.means(), &[2.0, 5.0]);
        assert_eq!(scaler.std_devs(), &[1.0, 1.0]);
        assert_abs_diff_eq!(z.get(0, 0).unwrap(), -1.0);
        assert_abs_diff_eq!(z.get(1, 0).unwrap(), 1.0);
        assert_abs_diff_eq!(z.get(1, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_transform_before_fit() {
        let scaler = StandardScaler::new();
        assert!(matches!(
            scaler.transform(&Matrix::zeros(1, 1)),
            Err(Error::NotFitted(_))
        ));
    }

    #[test]
    fn test_transform_width_mismatch() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&Matrix::zeros(2, 2)).unwrap();
        assert!(scaler.transform(&Matrix::zeros(2, 3)).is_err());
    }
}
