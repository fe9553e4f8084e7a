//! Evaluation metrics over `(n, 1)` column matrices.
//!
//! Classification metrics assume `0.0` / `1.0` labels with `1.0` as the
//! positive class; other values are counted as negatives.

use crate::core::error::{Error, Result};
use crate::core::matrix::Matrix;

fn paired<'a>(
    y_true: &'a Matrix,
    y_pred: &'a Matrix,
) -> Result<impl Iterator<Item = (f64, f64)> + 'a> {
    if y_true.rows() != y_pred.rows() || y_true.cols() != 1 || y_pred.cols() != 1 {
        return Err(Error::shape(y_true.shape(), y_pred.shape()));
    }
    Ok(y_true
        .as_slice()
        .iter()
        .copied()
        .zip(y_pred.as_slice().iter().copied()))
}

pub fn mean_squared_error(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let n = y_true.rows().max(1) as f64;
    Ok(paired(y_true, y_pred)?.map(|(t, p)| (t - p) * (t - p)).sum::<f64>() / n)
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// A constant `y_true` has `SS_tot = 0`; the score is then 1 for an exact fit
/// and 0 otherwise.
pub fn r2_score(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let mean = y_true.sum() / y_true.rows().max(1) as f64;
    let (ss_res, ss_tot) = paired(y_true, y_pred)?.fold((0.0, 0.0), |(res, tot), (t, p)| {
        (res + (t - p) * (t - p), tot + (t - mean) * (t - mean))
    });
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

pub fn accuracy_score(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let n = y_true.rows().max(1) as f64;
    let correct = paired(y_true, y_pred)?.filter(|(t, p)| t == p).count();
    Ok(correct as f64 / n)
}

struct Confusion {
    tp: f64,
    fp: f64,
    fn_: f64,
}

fn confusion(y_true: &Matrix, y_pred: &Matrix) -> Result<Confusion> {
    let mut c = Confusion {
        tp: 0.0,
        fp: 0.0,
        fn_: 0.0,
    };
    for (t, p) in paired(y_true, y_pred)? {
        match (t == 1.0, p == 1.0) {
            (true, true) => c.tp += 1.0,
            (false, true) => c.fp += 1.0,
            (true, false) => c.fn_ += 1.0,
            (false, false) => {}
        }
    }
    Ok(c)
}

/// `tp / (tp + fp)`, or 0 when nothing was predicted positive.
pub fn precision_score(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let c = confusion(y_true, y_pred)?;
    Ok(if c.tp + c.fp > 0.0 { c.tp / (c.tp + c.fp) } else { 0.0 })
}

/// `tp / (tp + fn)`, or 0 when there are no positives.
pub fn recall_score(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let c = confusion(y_true, y_pred)?;
    Ok(if c.tp + c.fn_ > 0.0 { c.tp / (c.tp + c.fn_) } else { 0.0 })
}

pub fn f1_score(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let p = precision_score(y_true, y_pred)?;
    let r = recall_score(y_true, y_pred)?;
    Ok(if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 })
}
