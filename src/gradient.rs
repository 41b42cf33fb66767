use ndarray::ArrayView1;

use crate::dataset::check_columns;
use crate::error::Result;

/// Partial derivatives `(dJ/dw, dJ/db)` of the squared error cost.
pub fn compute_gradient(
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    w: f64,
    b: f64,
) -> Result<(f64, f64)> {
    check_columns(x, y)?;

    Ok(partials(x, y, w, b))
}

pub(crate) fn partials(x: ArrayView1<f64>, y: ArrayView1<f64>, w: f64, b: f64) -> (f64, f64) {
    let m = x.len() as f64;

    let residuals = x.mapv(|x| w * x + b) - y;

    let dw = residuals.dot(&x) / m;
    let db = residuals.sum() / m;

    (dw, db)
}
