//! Reconstruction distributions for variational autoencoders, built on candle.
//!
//! A VAE decoder outputs distribution parameters rather than data. This crate
//! scores target data under those parameters and returns the gradient of the
//! score with respect to the decoder's pre-activation output, ready to feed
//! into backpropagation.
//!
//! # Features
//!
//! - [`GaussianReconstructionDistribution`]: diagonal Gaussian with
//!   mean / log-variance parameterization
//! - [`Activation`]: elementwise transform on the raw parameters, with its
//!   derivative for the chain rule
//! - [`ReconstructionConfig`]: serde/YAML configuration
//! - Shape validation with descriptive errors before any arithmetic
//!
//! # Quick Start
//!
//! ```ignore
//! use candle_core::{Device, Tensor};
//! use vae_recon::{Activation, GaussianReconstructionDistribution, ReconstructionDistribution};
//!
//! let device = Device::Cpu;
//! let dist = GaussianReconstructionDistribution::new(Activation::Tanh);
//!
//! // 784 data dimensions need 1568 decoder outputs
//! let x = Tensor::randn(0.0f32, 1.0, (32, 784), &device)?;
//! let params = Tensor::randn(0.0f32, 1.0, (32, dist.distribution_input_size(784)), &device)?;
//!
//! let loss = dist.neg_log_probability(&x, &params, true)?;
//! let grad = dist.gradient(&x, &params)?; // [32, 1568]
//! ```
//!
//! # Parameterization
//!
//! ```text
//! params   = activation(raw)              [batch, 2n]
//! μ        = params[:, 0..n]
//! log σ²   = params[:, n..2n]
//! log p(x) = Σ_ij [ -½ ln(2π) - ½ log σ²_ij - (x_ij - μ_ij)² / 2σ²_ij ]
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

pub mod activation;
mod config;
pub mod distribution;
mod error;

pub use activation::Activation;
pub use config::ReconstructionConfig;
pub use distribution::{
    GaussianReconstructionDistribution, ParamShape, ReconstructionDistribution, NEG_HALF_LOG_2PI,
};
pub use error::{ReconError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::activation::Activation;
    pub use crate::config::ReconstructionConfig;
    pub use crate::distribution::{GaussianReconstructionDistribution, ReconstructionDistribution};
    pub use crate::error::{ReconError, Result};
}
