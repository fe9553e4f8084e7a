use thiserror::Error;

/// Everything that can go wrong in matrix math, training, or persistence.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}.")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Index out of bounds! Tried to access ({row}, {col}) of {rows}x{cols} matrix.")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error(
        "Invalid slice rows {start_row}..{end_row}, cols {start_col}..{end_col} of {rows}x{cols} matrix."
    )]
    InvalidSlice {
        start_row: usize,
        end_row: usize,
        start_col: usize,
        end_col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("{0} has not been fitted yet")]
    NotFitted(&'static str),

    #[error("usage error: {0}")]
    Usage(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at token {token}: {message}")]
    Parse { token: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Error::DimensionMismatch { expected, actual }
    }
}
