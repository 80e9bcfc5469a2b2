//! Reconstruction distributions for variational autoencoders.
//!
//! The decoder of a VAE does not output data directly. It outputs the parameters
//! of a distribution over the data, and training maximises the log-likelihood of
//! the real data under that distribution. A [`ReconstructionDistribution`]
//! scores a batch (`log_probability`) and returns the gradient of that score
//! with respect to the decoder's pre-activation output (`gradient`).

mod gaussian;
mod shape;

use std::fmt;

use candle_core::Tensor;

use crate::error::Result;

pub use gaussian::{GaussianReconstructionDistribution, NEG_HALF_LOG_2PI};
pub use shape::ParamShape;

/// Parametric distribution over reconstructed data.
///
/// `x` is the target data, shaped `[batch, data_size]`. `params` is the raw
/// decoder output, shaped `[batch, distribution_input_size(data_size)]`.
/// Implementations never modify either tensor.
pub trait ReconstructionDistribution: Send + Sync + fmt::Display {
    /// Number of decoder outputs needed to parameterise `data_size` dimensions.
    fn distribution_input_size(&self, data_size: usize) -> usize;

    /// Log-likelihood of `x`, summed over the batch or averaged per example.
    ///
    /// # Errors
    ///
    /// Returns error if the shapes are inconsistent or tensor operations fail.
    fn log_probability(&self, x: &Tensor, params: &Tensor, average: bool) -> Result<f64>;

    /// Negative log-likelihood, the loss a training loop minimises.
    ///
    /// # Errors
    ///
    /// Same as [`log_probability`](Self::log_probability).
    fn neg_log_probability(&self, x: &Tensor, params: &Tensor, average: bool) -> Result<f64> {
        Ok(-self.log_probability(x, params, average)?)
    }

    /// Log-likelihood of each example, shaped `[batch, 1]`.
    ///
    /// # Errors
    ///
    /// Returns error if the shapes are inconsistent or tensor operations fail.
    fn example_log_probability(&self, x: &Tensor, params: &Tensor) -> Result<Tensor>;

    /// Negative log-likelihood of each example, shaped `[batch, 1]`.
    ///
    /// # Errors
    ///
    /// Same as [`example_log_probability`](Self::example_log_probability).
    fn example_neg_log_probability(&self, x: &Tensor, params: &Tensor) -> Result<Tensor> {
        Ok(self.example_log_probability(x, params)?.neg()?)
    }

    /// Gradient of the summed (not averaged) log-likelihood with respect to the
    /// pre-activation parameters. Same shape as `params`.
    ///
    /// # Errors
    ///
    /// Returns error if the shapes are inconsistent or tensor operations fail.
    fn gradient(&self, x: &Tensor, params: &Tensor) -> Result<Tensor>;

    /// Deterministic reconstruction: the distribution mean, `[batch, data_size]`.
    ///
    /// # Errors
    ///
    /// Returns error if `params` is malformed or tensor operations fail.
    fn generate_at_mean(&self, params: &Tensor) -> Result<Tensor>;

    /// Short name of the distribution family.
    fn name(&self) -> &'static str;
}
