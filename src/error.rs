//! Error types for training and prediction
//!

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),
    /// Feature column has zero variance (or zero range), scaling is undefined.
    #[error("degenerate feature scale: {0}")]
    DegenerateScale(String),
    #[error("could not access coefficients file {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed coefficients: {0}")]
    MalformedCoefficients(String),
    #[error("could not read dataset: {0}")]
    Dataset(#[from] csv::Error),
}
