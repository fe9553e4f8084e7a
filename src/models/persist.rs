//! Plain-text parameter files for the regression models.
//!
//! Layout, whitespace separated:
//!
//! ```text
//! <alpha>
//! <weight_rows> <weight_cols>
//! <w(0,0)> <w(1,0)> ...
//! <bias_rows> <bias_cols>
//! <bias(0,0)>
//! ```
//!
//! Floats are written in their shortest round-trip form so a reload is bit-exact.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;
use crate::models::regularization::LinearParams;

/// Save/restore of learning rate, weights and bias.
pub trait Persist {
    fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Overwrites the learning rate, weights and bias from `path`.
    fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()>;
}

pub(crate) fn write_params<W: Write>(
    out: &mut W,
    alpha: f64,
    params: &LinearParams,
) -> Result<()> {
    writeln!(out, "{alpha:?}")?;
    writeln!(out, "{} {}", params.weights.rows(), params.weights.cols())?;
    for w in params.weights.as_slice() {
        write!(out, "{w:?} ")?;
    }
    writeln!(out)?;
    writeln!(out, "{} {}", params.bias.rows(), params.bias.cols())?;
    writeln!(out, "{:?}", params.bias())?;
    Ok(())
}

struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
            pos: 0,
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.iter.next().ok_or_else(|| Error::Parse {
            token: self.pos,
            message: format!("unexpected end of file, expected {what}"),
        })?;
        let value = token.parse().map_err(|_| Error::Parse {
            token: self.pos,
            message: format!("invalid {what}: {token:?}"),
        })?;
        self.pos += 1;
        Ok(value)
    }

    fn matrix(&mut self, what: &str, expected_cols: usize) -> Result<Matrix> {
        let rows: usize = self.next(&format!("{what} rows"))?;
        let cols: usize = self.next(&format!("{what} cols"))?;
        if cols != expected_cols || rows == 0 {
            return Err(Error::Parse {
                token: self.pos,
                message: format!("{what} has unsupported shape {rows}x{cols}"),
            });
        }
        let mut data = Vec::new();
        for _ in 0..rows * cols {
            data.push(self.next::<f64>(what)?);
        }
        Matrix::from_vec(rows, cols, data)
    }

    fn finish(mut self) -> Result<()> {
        match self.iter.next() {
            None => Ok(()),
            Some(extra) => Err(Error::Parse {
                token: self.pos,
                message: format!("trailing data {extra:?}"),
            }),
        }
    }
}

/// Parses the text layout back into `(alpha, params)`.
pub(crate) fn parse_params(text: &str) -> Result<(f64, LinearParams)> {
    let mut tokens = Tokens::new(text);
    let alpha = tokens.next("alpha")?;
    let weights = tokens.matrix("weights", 1)?;
    let bias = tokens.matrix("bias", 1)?;
    if bias.rows() != 1 {
        return Err(Error::Parse {
            token: tokens.pos,
            message: format!("bias must be 1x1, got {}x1", bias.rows()),
        });
    }
    tokens.finish()?;
    Ok((alpha, LinearParams { weights, bias }))
}

pub(crate) fn save(
    path: &Path,
    model: &'static str,
    alpha: f64,
    params: &LinearParams,
) -> Result<()> {
    if !params.is_fitted() {
        return Err(Error::NotFitted(model));
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_params(&mut out, alpha, params)?;
    out.flush()?;
    log::info!("{model} saved to {}", path.display());
    Ok(())
}

pub(crate) fn load(path: &Path, model: &'static str) -> Result<(f64, LinearParams)> {
    let text = fs::read_to_string(path)?;
    let loaded = parse_params(&text)?;
    log::info!(
        "{model} loaded from {} ({} weights)",
        path.display(),
        loaded.1.weights.rows()
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LinearParams {
        LinearParams {
            weights: Matrix::from_vec(3, 1, vec![0.1, -2.5, 1e-20]).unwrap(),
            bias: Matrix::from_vec(1, 1, vec![1.0 / 3.0]).unwrap(),
        }
    }

    #[test]
    fn test_layout() {
        let mut buf = Vec::new();
        write_params(&mut buf, 0.01, &params()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "0.01");
        assert_eq!(lines[1], "3 1");
        assert_eq!(lines[2].split_whitespace().count(), 3);
        assert_eq!(lines[3], "1 1");
        assert_eq!(lines[4], "0.3333333333333333");
    }

    #[test]
    fn test_parse_is_bit_exact() {
        let mut buf = Vec::new();
        write_params(&mut buf, 0.01, &params()).unwrap();
        let (alpha, parsed) = parse_params(std::str::from_utf8(&buf).unwrap()).unwrap();
        assert_eq!(alpha, 0.01);
        assert_eq!(parsed, params());
    }

    #[test]
    fn test_parse_truncated() {
        let err = parse_params("0.01\n3 1\n0.5 0.25\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_params("abc\n1 1\n0.5\n1 1\n0.0\n"),
            Err(Error::Parse { token: 0, .. })
        ));
        assert!(parse_params("0.1\n1 2\n0.5 0.5\n1 1\n0.0\n").is_err());
        assert!(parse_params("0.1\n1 1\n0.5\n1 1\n0.0\nextra\n").is_err());
    }
}
