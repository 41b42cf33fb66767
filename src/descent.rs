//! Batch gradient descent on the two line coefficients.
//!
//! The driver only ever sees the (possibly scaled) feature column it was
//! given. Mapping the result back to kilometers is the caller's job.

use ndarray::ArrayView1;

use crate::config::TrainingConfig;
use crate::cost::squared_error;
use crate::dataset::check_columns;
use crate::error::Result;
use crate::gradient::partials;
use crate::model::LinearModel;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    /// Both coefficients moved less than the tolerance in the last step.
    Converged,
    /// A gradient or candidate update was NaN or infinite. The update was
    /// discarded and the last finite coefficients kept.
    Diverged,
    ExhaustedIterations,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostSample {
    pub iteration: usize,
    pub cost: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CostHistory {
    samples: Vec<CostSample>,
}

impl CostHistory {
    fn push(&mut self, iteration: usize, cost: f64) {
        self.samples.push(CostSample { iteration, cost });
    }

    pub fn samples(&self) -> &[CostSample] {
        &self.samples
    }

    pub fn iterations(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.iteration).collect()
    }

    pub fn costs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.cost).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Descent {
    pub model: LinearModel,
    pub state: State,
    /// Number of accepted updates.
    pub iterations: usize,
    pub history: CostHistory,
}

pub struct GradientDescent<'a> {
    x: ArrayView1<'a, f64>,
    y: ArrayView1<'a, f64>,
    learning_rate: f64,
    tolerance: f64,
    max_iterations: usize,
    sample_interval: usize,
    model: LinearModel,
    iteration: usize,
    state: State,
    history: CostHistory,
}

impl<'a> GradientDescent<'a> {
    /// `initial` must already be expressed on the scale of `x`. Fails on
    /// empty or unequal columns.
    pub fn new(
        x: ArrayView1<'a, f64>,
        y: ArrayView1<'a, f64>,
        initial: LinearModel,
        config: &TrainingConfig,
    ) -> Result<Self> {
        check_columns(x, y)?;

        Ok(GradientDescent {
            x,
            y,
            learning_rate: config.learning_rate,
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            sample_interval: config.sample_interval.max(1),
            model: initial,
            iteration: 0,
            state: State::Running,
            history: CostHistory::default(),
        })
    }

    pub fn model(&self) -> LinearModel {
        self.model
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn history(&self) -> &CostHistory {
        &self.history
    }

    /// Performs one update unless the run already terminated.
    pub fn step(&mut self) -> State {
        if self.state != State::Running {
            return self.state;
        }

        if self.iteration >= self.max_iterations {
            self.state = State::ExhaustedIterations;
            return self.state;
        }

        let i = self.iteration;
        let LinearModel { w, b } = self.model;

        let (dw, db) = partials(self.x, self.y, w, b);
        let candidate = LinearModel::new(w - self.learning_rate * dw, b - self.learning_rate * db);

        if !(dw.is_finite() && db.is_finite() && candidate.is_finite()) {
            log::warn!(
                "gradient descent diverged at iteration {i} (dw = {dw}, db = {db}), keeping w = {w}, b = {b}"
            );
            self.state = State::Diverged;
            return self.state;
        }

        if i % self.sample_interval == 0 {
            let cost = squared_error(self.x, self.y, candidate.w, candidate.b);
            log::debug!("iteration {i}: cost {cost}");
            self.history.push(i, cost);
        }

        let converged = (candidate.w - w).abs() < self.tolerance
            && (candidate.b - b).abs() < self.tolerance;

        self.model = candidate;
        self.iteration += 1;

        if converged {
            log::info!("converged after {} iterations", self.iteration);
            self.state = State::Converged;
        } else if self.iteration >= self.max_iterations {
            log::info!(
                "stopped after {} iterations without converging",
                self.iteration
            );
            self.state = State::ExhaustedIterations;
        }

        self.state
    }

    pub fn run(mut self) -> Descent {
        while self.step() == State::Running {}

        Descent {
            model: self.model,
            state: self.state,
            iterations: self.iteration,
            history: self.history,
        }
    }
}
