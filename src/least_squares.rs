//! Exact least squares line from the normal equations.
//!
//! Used as a reference for how far gradient descent landed from the optimum.

use nalgebra::{Matrix2, Vector2};
use ndarray::ArrayView1;

use crate::dataset::check_columns;
use crate::error::{Error, Result};
use crate::model::LinearModel;

pub fn fit(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<LinearModel> {
    check_columns(x, y)?;

    let m = x.len() as f64;
    let mean_x = x.sum() / m;

    // solve on the centered feature, raw kilometers square into a badly
    // conditioned system
    let centered = x.mapv(|v| v - mean_x);
    let sum_c = centered.sum();
    let sum_cc = centered.dot(&centered);

    if !(sum_cc > x.dot(&x) * f64::EPSILON) {
        return Err(Error::DegenerateScale(
            "normal equations are singular, the feature column is constant".to_string(),
        ));
    }

    let normal = Matrix2::new(sum_cc, sum_c, sum_c, m);
    let rhs = Vector2::new(centered.dot(&y), y.sum());

    let solution = normal.lu().solve(&rhs).ok_or_else(|| {
        Error::DegenerateScale("normal equations are singular".to_string())
    })?;

    let (w, b_centered) = (solution[0], solution[1]);

    Ok(LinearModel::new(w, b_centered - w * mean_x))
}
