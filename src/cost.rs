use ndarray::{Array1, ArrayView1};

use crate::dataset::check_columns;
use crate::error::Result;

/// Squared error cost `1/(2m) * sum((w * x + b - y)^2)`.
///
/// NaN anywhere in the inputs gives a NaN cost. Empty or unequal columns are
/// rejected.
pub fn compute_cost(x: ArrayView1<f64>, y: ArrayView1<f64>, w: f64, b: f64) -> Result<f64> {
    check_columns(x, y)?;

    Ok(squared_error(x, y, w, b))
}

/// Columns must already be checked.
pub(crate) fn squared_error(x: ArrayView1<f64>, y: ArrayView1<f64>, w: f64, b: f64) -> f64 {
    let m = x.len() as f64;

    let residuals = x.mapv(|x| w * x + b) - y;

    residuals.mapv(|r| r * r).sum() / (2. * m)
}

/// Cost along `ws` with the intercept held at `b`.
pub fn cost_curve_w(
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    ws: &Array1<f64>,
    b: f64,
) -> Result<Vec<(f64, f64)>> {
    check_columns(x, y)?;

    Ok(ws.iter().map(|&w| (w, squared_error(x, y, w, b))).collect())
}

/// Cost along `bs` with the slope held at `w`.
pub fn cost_curve_b(
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    w: f64,
    bs: &Array1<f64>,
) -> Result<Vec<(f64, f64)>> {
    check_columns(x, y)?;

    Ok(bs.iter().map(|&b| (b, squared_error(x, y, w, b))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::noisy_line;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array};

    #[test]
    fn perfect_fit_costs_nothing() {
        let x = array![1., 2., 3.];
        let y = array![12., 22., 32.];

        assert_abs_diff_eq!(compute_cost(x.view(), y.view(), 10., 2.).unwrap(), 0.);
    }

    #[test]
    fn halves_the_mean_squared_error() {
        let x = array![0., 1.];
        let y = array![1., 2.];

        // residuals -1 and -2
        assert_abs_diff_eq!(compute_cost(x.view(), y.view(), 0., 0.).unwrap(), 5. / 4.);
    }

    #[test]
    fn cost_is_never_negative() {
        let samples = noisy_line(200, -0.02, 8500., 400., 7);

        for &w in Array::linspace(-1., 1., 21).iter() {
            for &b in Array::linspace(-10000., 10000., 21).iter() {
                assert!(compute_cost(samples.x(), samples.y(), w, b).unwrap() >= 0.);
            }
        }
    }

    #[test]
    fn nan_propagates() {
        let x = array![1., f64::NAN];
        let y = array![1., 2.];

        assert!(compute_cost(x.view(), y.view(), 1., 0.).unwrap().is_nan());
    }

    #[test]
    fn curves_follow_the_sweep() {
        let x = array![1., 2.];
        let y = array![2., 4.];
        let ws = Array::linspace(0., 4., 5);

        let curve = cost_curve_w(x.view(), y.view(), &ws, 0.).unwrap();

        assert_eq!(curve.len(), 5);
        let (best_w, best_cost) = curve
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_eq!(best_w, 2.);
        assert_abs_diff_eq!(best_cost, 0.);

        let curve = cost_curve_b(x.view(), y.view(), 2., &Array::linspace(-1., 1., 3)).unwrap();
        assert_eq!(curve[1], (0., 0.));
        assert_abs_diff_eq!(curve[0].1, 0.5);
    }

    #[test]
    fn rejects_columns_of_different_lengths() {
        let x = array![1., 2., 3.];

        // a single target must not broadcast against every feature
        assert!(matches!(
            compute_cost(x.view(), array![5.].view(), 0., 0.),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_cost(array![1., 2.].view(), array![1., 2., 3.].view(), 0., 0.),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            cost_curve_w(x.view(), array![5.].view(), &Array::linspace(0., 1., 3), 0.),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_empty_columns() {
        let empty: Array1<f64> = Array1::zeros(0);

        assert!(matches!(
            compute_cost(empty.view(), empty.view(), 1., 0.),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            cost_curve_b(empty.view(), empty.view(), 1., &Array::linspace(0., 1., 3)),
            Err(Error::InvalidInput(_))
        ));
    }
}
