use crate::error::{Error, Result};
use crate::model::LinearModel;
use crate::scaling::ScalingPolicy;

pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
pub const DEFAULT_TOLERANCE: f64 = 1e-8;
pub const DEFAULT_MAX_ITERATIONS: usize = 5000;
pub const DEFAULT_SAMPLE_INTERVAL: usize = 100;

/// Everything a training run needs besides the data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    /// Both parameters must move less than this for the run to converge.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Record the cost every this many iterations.
    pub sample_interval: usize,
    /// Starting coefficients, on the original feature scale.
    pub initial: LinearModel,
    pub scaling: ScalingPolicy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            learning_rate: DEFAULT_LEARNING_RATE,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            initial: LinearModel::default(),
            scaling: ScalingPolicy::default(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }

        if !(self.tolerance.is_finite() && self.tolerance >= 0.) {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }

        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max iterations must be at least 1".to_string(),
            ));
        }

        if self.sample_interval == 0 {
            return Err(Error::InvalidConfig(
                "cost sample interval must be at least 1".to_string(),
            ));
        }

        if !self.initial.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "initial coefficients must be finite, got w = {}, b = {}",
                self.initial.w, self.initial.b
            )));
        }

        Ok(())
    }
}
