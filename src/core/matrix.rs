use std::fmt;
use std::ops::Mul;

use num_traits::Num;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::core::error::{Error, Result};

/// Edge length of the square tiles used by [`Matrix::transpose`].
const TRANSPOSE_BLOCK: usize = 32;

/// Dense, row-major matrix. Every value owns its storage; `clone` is a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T = f64> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Num + Copy> Matrix<T> {
    pub fn new(rows: usize, cols: usize, val: T) -> Matrix<T> {
        let data = vec![val; rows * cols];
        Matrix { rows, cols, data }
    }

    pub fn zeros(rows: usize, cols: usize) -> Matrix<T> {
        Matrix::new(rows, cols, T::zero())
    }

    /// Wraps row-major `data`; its length must be exactly `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Matrix<T>> {
        if data.len() != rows * cols {
            return Err(Error::Usage(format!(
                "{rows}x{cols} matrix needs {} values, got {}",
                rows * cols,
                data.len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from equally sized rows.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Matrix<T>> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::shape((1, cols), (1, row.len())));
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let index = self.index(row, col)?;
        Ok(self.data[index])
    }

    pub fn set(&mut self, row: usize, col: usize, val: T) -> Result<()> {
        let index = self.index(row, col)?;
        self.data[index] = val;
        Ok(())
    }

    /// Iterates over the rows as slices.
    pub fn row_iter(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Copies row `row` out as a `1 x cols` matrix.
    pub fn get_row(&self, row: usize) -> Result<Matrix<T>> {
        if row >= self.rows {
            return Err(Error::IndexOutOfBounds {
                row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let start = row * self.cols;
        Ok(Matrix {
            rows: 1,
            cols: self.cols,
            data: self.data[start..start + self.cols].to_vec(),
        })
    }

    /// Copies the half-open block `[start_row, end_row) x [start_col, end_col)`.
    ///
    /// Empty ranges are rejected along with ranges that run past the matrix.
    pub fn get_slice(
        &self,
        start_row: usize,
        end_row: usize,
        start_col: usize,
        end_col: usize,
    ) -> Result<Matrix<T>> {
        let empty = start_row >= end_row || start_col >= end_col;
        if empty || end_row > self.rows || end_col > self.cols {
            return Err(Error::InvalidSlice {
                start_row,
                end_row,
                start_col,
                end_col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let cols = end_col - start_col;
        let mut data = Vec::with_capacity((end_row - start_row) * cols);
        for r in start_row..end_row {
            let offset = r * self.cols;
            data.extend_from_slice(&self.data[offset + start_col..offset + end_col]);
        }
        Ok(Matrix {
            rows: end_row - start_row,
            cols,
            data,
        })
    }

    fn check_same_shape(&self, b: &Matrix<T>) -> Result<()> {
        if self.rows != b.rows || self.cols != b.cols {
            return Err(Error::shape(self.shape(), b.shape()));
        }
        Ok(())
    }

    pub fn add_in_place(&mut self, b: &Matrix<T>) -> Result<()> {
        self.check_same_shape(b)?;
        self.data
            .iter_mut()
            .zip(&b.data)
            .for_each(|(a_val, b_val)| *a_val = *a_val + *b_val);
        Ok(())
    }

    pub fn sub_in_place(&mut self, b: &Matrix<T>) -> Result<()> {
        self.check_same_shape(b)?;
        self.data
            .iter_mut()
            .zip(&b.data)
            .for_each(|(a_val, b_val)| *a_val = *a_val - *b_val);
        Ok(())
    }

    pub fn add(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        let mut res = self.clone();
        res.add_in_place(b)?;
        Ok(res)
    }

    pub fn sub(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        let mut res = self.clone();
        res.sub_in_place(b)?;
        Ok(res)
    }

    pub fn scale(&self, scalar: T) -> Matrix<T> {
        self.map(|x| x * scalar)
    }

    /// Adds the `1 x cols` matrix `row` to every row of `self`.
    pub fn add_row_broadcast(&mut self, row: &Matrix<T>) -> Result<()> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(Error::shape((1, self.cols), row.shape()));
        }
        self.data.chunks_mut(self.cols.max(1)).for_each(|chunk| {
            chunk
                .iter_mut()
                .zip(&row.data)
                .for_each(|(a_val, b_val)| *a_val = *a_val + *b_val);
        });
        Ok(())
    }

    /// Matrix product `self * b`, shape `(self.rows, b.cols)`.
    pub fn matmul(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        if self.cols != b.rows {
            return Err(Error::shape((self.cols, b.cols), b.shape()));
        }

        let mut c = Matrix::zeros(self.rows, b.cols);
        for i in 0..self.rows {
            let out = &mut c.data[i * b.cols..(i + 1) * b.cols];
            for k in 0..self.cols {
                let a_ik = self.data[i * self.cols + k];
                let b_row = &b.data[k * b.cols..(k + 1) * b.cols];
                for (acc, b_kj) in out.iter_mut().zip(b_row) {
                    *acc = *acc + a_ik * *b_kj;
                }
            }
        }
        Ok(c)
    }

    /// Returns the `(cols, rows)` transpose, copying in square tiles.
    pub fn transpose(&self) -> Matrix<T> {
        let mut result = Matrix::zeros(self.cols, self.rows);
        for i in (0..self.rows).step_by(TRANSPOSE_BLOCK) {
            for j in (0..self.cols).step_by(TRANSPOSE_BLOCK) {
                for ii in i..(i + TRANSPOSE_BLOCK).min(self.rows) {
                    for jj in j..(j + TRANSPOSE_BLOCK).min(self.cols) {
                        result.data[jj * self.rows + ii] = self.data[ii * self.cols + jj];
                    }
                }
            }
        }
        result
    }

    /// Sums every column into a `1 x cols` matrix.
    pub fn column_sum(&self) -> Matrix<T> {
        let mut result = Matrix::zeros(1, self.cols);
        for row in self.row_iter() {
            result
                .data
                .iter_mut()
                .zip(row)
                .for_each(|(acc, val)| *acc = *acc + *val);
        }
        result
    }

    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(T) -> T,
    {
        self.data.iter_mut().for_each(|x| {
            *x = f(*x);
        });
    }

    pub fn map<F>(&self, f: F) -> Matrix<T>
    where
        F: Fn(T) -> T,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Combines two equally shaped matrices cell by cell.
    pub fn zip_map<F>(&self, b: &Matrix<T>, f: F) -> Result<Matrix<T>>
    where
        F: Fn(T, T) -> T,
    {
        self.check_same_shape(b)?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&b.data)
                .map(|(&x, &y)| f(x, y))
                .collect(),
        })
    }
}

impl Matrix<f64> {
    /// Fills a matrix with independent draws from `N(0, std_dev^2)`.
    pub fn random_normal<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        std_dev: f64,
        rng: &mut R,
    ) -> Result<Matrix<f64>> {
        let normal = Normal::new(0.0, std_dev)
            .map_err(|e| Error::InvalidConfig(format!("normal std dev {std_dev}: {e}")))?;
        let data = (0..rows * cols).map(|_| normal.sample(rng)).collect();
        Ok(Matrix { rows, cols, data })
    }
}

impl<T: Num + Copy> Default for Matrix<T> {
    fn default() -> Self {
        Matrix::zeros(0, 0)
    }
}

impl<T: Num + Copy> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, scalar: T) -> Matrix<T> {
        self.scale(scalar)
    }
}

impl<T: Num + Copy> Mul<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(mut self, scalar: T) -> Matrix<T> {
        self.apply(|x| x * scalar);
        self
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix({}x{}) [", self.rows, self.cols)?;
        for r in 0..self.rows {
            write!(f, "  [")?;
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data[r * self.cols + c])?;
            }
            write!(f, "]")?;
            if r + 1 < self.rows {
                write!(f, ",")?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}
