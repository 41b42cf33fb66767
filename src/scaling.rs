//! Feature scaling and the matching coefficient transforms.
//!
//! Gradient descent on raw kilometer values (tens of thousands) needs a tiny
//! learning rate and many iterations, so the feature column is scaled before
//! training. Every policy is an affine map `x' = (x - shift) / scale`, which
//! lets the coefficients learned on `x'` be mapped back exactly.

use ndarray::{Array1, ArrayView1};

use crate::error::{Error, Result};
use crate::model::LinearModel;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ScalingPolicy {
    /// Train on raw feature values.
    None,
    /// `(x - min) / (max - min)`
    MinMax,
    /// `(x - mean) / std`
    #[default]
    ZScore,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

pub fn find_max_min<T: std::cmp::PartialOrd + Copy>(
    mut data: impl Iterator<Item = T>,
) -> Option<MinMax<T>> {
    let init = data.next()?;
    let mut min_max = MinMax {
        min: init,
        max: init,
    };

    for x in data {
        min_max = MinMax {
            min: if x < min_max.min { x } else { min_max.min },
            max: if x > min_max.max { x } else { min_max.max },
        };
    }

    Some(min_max)
}

/// Statistics of the original feature column, fitted once per training run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scaler {
    Identity,
    MinMax(MinMax<f64>),
    ZScore { mean: f64, std: f64 },
}

impl Scaler {
    pub fn fit(policy: ScalingPolicy, x: ArrayView1<f64>) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::InvalidInput(
                "cannot fit a scaler on an empty feature column".to_string(),
            ));
        }

        let scaler = match policy {
            ScalingPolicy::None => Scaler::Identity,
            ScalingPolicy::MinMax => Scaler::MinMax(min_max(x)?),
            ScalingPolicy::ZScore => {
                let (mean, std) = mean_std(x)?;
                Scaler::ZScore { mean, std }
            }
        };

        Ok(scaler)
    }

    fn shift_scale(&self) -> (f64, f64) {
        match *self {
            Scaler::Identity => (0., 1.),
            Scaler::MinMax(MinMax { min, max }) => (min, max - min),
            Scaler::ZScore { mean, std } => (mean, std),
        }
    }

    pub fn forward(&self, x: ArrayView1<f64>) -> Array1<f64> {
        match self {
            Scaler::Identity => x.to_owned(),
            _ => {
                let (shift, scale) = self.shift_scale();
                x.mapv(|v| (v - shift) / scale)
            }
        }
    }

    /// Coefficients learned on scaled features, expressed on original features.
    pub fn inverse(&self, scaled: LinearModel) -> LinearModel {
        let (shift, scale) = self.shift_scale();

        LinearModel {
            w: scaled.w / scale,
            b: scaled.b - scaled.w * shift / scale,
        }
    }

    /// Original-scale coefficients expressed on scaled features.
    pub fn forward_model(&self, original: LinearModel) -> LinearModel {
        let (shift, scale) = self.shift_scale();

        LinearModel {
            w: original.w * scale,
            b: original.b + original.w * shift,
        }
    }
}

fn mean_std(x: ArrayView1<f64>) -> Result<(f64, f64)> {
    let mean = x
        .mean()
        .ok_or_else(|| Error::InvalidInput("empty feature column".to_string()))?;
    // population standard deviation
    let std = x.std(0.);

    if std == 0. || std < mean.abs() * f64::EPSILON {
        return Err(Error::DegenerateScale(format!(
            "standard deviation of the feature column is zero (mean {mean})"
        )));
    }

    Ok((mean, std))
}

fn min_max(x: ArrayView1<f64>) -> Result<MinMax<f64>> {
    let bounds = find_max_min(x.iter().copied())
        .ok_or_else(|| Error::InvalidInput("empty feature column".to_string()))?;

    if bounds.max - bounds.min == 0. {
        return Err(Error::DegenerateScale(format!(
            "feature column has zero range (every value is {})",
            bounds.min
        )));
    }

    Ok(bounds)
}

/// Z-score standardization, returns the scaled column with its mean and
/// population standard deviation.
pub fn standardize(x: ArrayView1<f64>) -> Result<(Array1<f64>, f64, f64)> {
    let (mean, std) = mean_std(x)?;
    let scaler = Scaler::ZScore { mean, std };

    Ok((scaler.forward(x), mean, std))
}

pub fn denormalize(mean: f64, std: f64, w_scaled: f64, b_scaled: f64) -> (f64, f64) {
    let LinearModel { w, b } =
        Scaler::ZScore { mean, std }.inverse(LinearModel::new(w_scaled, b_scaled));
    (w, b)
}

/// Min-max normalization into `[0, 1]`, returns the scaled column with its
/// minimum and maximum.
pub fn normalize(x: ArrayView1<f64>) -> Result<(Array1<f64>, f64, f64)> {
    let bounds = min_max(x)?;
    let scaler = Scaler::MinMax(bounds);

    Ok((scaler.forward(x), bounds.min, bounds.max))
}

pub fn denormalize_min_max(min: f64, max: f64, w_scaled: f64, b_scaled: f64) -> (f64, f64) {
    let LinearModel { w, b } =
        Scaler::MinMax(MinMax { min, max }).inverse(LinearModel::new(w_scaled, b_scaled));
    (w, b)
}
