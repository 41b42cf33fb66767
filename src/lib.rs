//! Car price estimation from mileage with single feature linear regression,
//! trained by batch gradient descent.

pub mod cli;
pub mod config;
pub mod cost;
pub mod dataset;
pub mod descent;
pub mod error;
pub mod gradient;
pub mod least_squares;
pub mod model;
pub mod plots;
pub mod scaling;
pub mod training;

pub use config::TrainingConfig;
pub use error::{Error, Result};
pub use model::LinearModel;
pub use training::{train, TrainingReport};
