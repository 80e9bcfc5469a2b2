//! Error types for vae-recon.

use candle_core::DType;
use thiserror::Error;

/// Result type alias for reconstruction distribution operations.
pub type Result<T> = std::result::Result<T, ReconError>;

/// Errors that can occur while evaluating a reconstruction distribution.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Invalid configuration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Activation name not recognised.
    #[error("unknown activation function: {0:?}")]
    UnknownActivation(String),

    /// Shape mismatch between the target data and the distribution parameters.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        actual: Vec<usize>,
    },

    /// Tensor has the wrong number of dimensions.
    #[error("{name} must have rank {expected}, got rank {actual}")]
    RankMismatch {
        /// Which argument was malformed.
        name: &'static str,
        /// Expected rank.
        expected: usize,
        /// Actual rank.
        actual: usize,
    },

    /// Parameter width cannot be split into mean and log-variance halves.
    #[error("distribution parameter width must be even (mean + log-variance), got {0}")]
    OddParameterWidth(usize),

    /// Target data and parameters use different element types.
    #[error("dtype mismatch: data is {data:?}, parameters are {params:?}")]
    DTypeMismatch {
        /// Element type of the target data.
        data: DType,
        /// Element type of the parameters.
        params: DType,
    },

    /// Candle tensor operation error.
    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for ReconError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
