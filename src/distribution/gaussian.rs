//! Diagonal Gaussian reconstruction distribution.
//!
//! The decoder output is split into a mean half and a log-variance half:
//!
//! ```text
//! params = [ μ_1 .. μ_n | log σ²_1 .. log σ²_n ]      (after the activation)
//! ```
//!
//! Modelling log(σ²) rather than σ² lets the raw output range over all of ℝ,
//! and log(1) = 0 puts unit variance at zero output. The log-density of one
//! example is
//!
//! ```text
//! log p(x) = Σ_j [ -½ ln(2π) - ½ log σ²_j - (x_j - μ_j)² / (2σ²_j) ]
//! ```
//!
//! and the batch log-probability is the sum over examples.
//!
//! No epsilon or clamping is applied to the variance. A log-variance large and
//! negative enough for `exp` to underflow gives infinite or NaN results, which
//! propagate to the caller as values.

use std::fmt;

use candle_core::{DType, Tensor};

use super::shape::ParamShape;
use super::ReconstructionDistribution;
use crate::activation::Activation;
use crate::error::Result;

/// -½ ln(2π)
pub const NEG_HALF_LOG_2PI: f64 = -0.918_938_533_204_672_8;

/// Gaussian reconstruction distribution with diagonal covariance.
///
/// Mean and log-variance for every output dimension come from the decoder,
/// passed through `activation`. Identity and tanh are the typical choices.
///
/// # Example
///
/// ```rust
/// use candle_core::{Device, Tensor};
/// use vae_recon::{Activation, GaussianReconstructionDistribution, ReconstructionDistribution};
///
/// # fn main() -> vae_recon::Result<()> {
/// let dist = GaussianReconstructionDistribution::new(Activation::Identity);
/// assert_eq!(dist.distribution_input_size(3), 6);
///
/// // One example, one dimension: N(0, 1) evaluated at 0
/// let x = Tensor::zeros((1, 1), candle_core::DType::F64, &Device::Cpu)?;
/// let params = Tensor::zeros((1, 2), candle_core::DType::F64, &Device::Cpu)?;
/// let log_p = dist.log_probability(&x, &params, false)?;
/// assert!((log_p + 0.5 * (2.0 * std::f64::consts::PI).ln()).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GaussianReconstructionDistribution {
    activation: Activation,
}

/// Mean and log-variance halves of the activated parameters.
struct Split {
    shape: ParamShape,
    mean: Tensor,
    log_var: Tensor,
}

impl GaussianReconstructionDistribution {
    /// Create a distribution whose parameters pass through `activation`.
    #[must_use]
    pub const fn new(activation: Activation) -> Self {
        Self { activation }
    }

    /// Create a distribution from an activation name such as `"tanh"`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconError::UnknownActivation`](crate::ReconError::UnknownActivation)
    /// if the name is not recognised.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// The activation applied to the raw parameters.
    #[must_use]
    pub const fn activation(&self) -> Activation {
        self.activation
    }

    fn split(&self, shape: ParamShape, params: &Tensor) -> Result<Split> {
        let output = self.activation.apply(params)?;

        Ok(Split {
            shape,
            mean: output.narrow(1, 0, shape.size)?,
            log_var: output.narrow(1, shape.size, shape.size)?,
        })
    }
}

impl ReconstructionDistribution for GaussianReconstructionDistribution {
    fn distribution_input_size(&self, data_size: usize) -> usize {
        2 * data_size
    }

    fn log_probability(&self, x: &Tensor, params: &Tensor, average: bool) -> Result<f64> {
        let shape = ParamShape::infer(x, params)?;
        if shape.numel() == 0 {
            // empty sum; 0 / 0 when averaging an empty batch
            return Ok(if average { 0.0 / shape.batch as f64 } else { 0.0 });
        }
        let Split {
            shape,
            mean,
            log_var,
        } = self.split(shape, params)?;
        tracing::trace!(
            "gaussian log_probability: batch={}, size={}, afn={}",
            shape.batch,
            shape.size,
            self.activation
        );

        let variance = log_var.exp()?;
        let quadratic = x.sub(&mean)?.sqr()?.div(&variance)?.affine(0.5, 0.0)?;

        let log_prob = shape.numel() as f64 * NEG_HALF_LOG_2PI
            - 0.5 * sum_f64(&log_var)?
            - sum_f64(&quadratic)?;

        if average {
            Ok(log_prob / shape.batch as f64)
        } else {
            Ok(log_prob)
        }
    }

    fn example_log_probability(&self, x: &Tensor, params: &Tensor) -> Result<Tensor> {
        let shape = ParamShape::infer(x, params)?;
        if shape.numel() == 0 {
            return Ok(Tensor::zeros((shape.batch, 1), params.dtype(), params.device())?);
        }
        let Split {
            shape,
            mean,
            log_var,
        } = self.split(shape, params)?;

        let variance = log_var.exp()?;
        // ½ log σ² + (x - μ)² / 2σ², per element
        let per_element = x
            .sub(&mean)?
            .sqr()?
            .div(&variance)?
            .add(&log_var)?
            .affine(0.5, 0.0)?;

        let constant = shape.size as f64 * NEG_HALF_LOG_2PI;
        Ok(per_element.sum_keepdim(1)?.affine(-1.0, constant)?)
    }

    fn gradient(&self, x: &Tensor, params: &Tensor) -> Result<Tensor> {
        let shape = ParamShape::infer(x, params)?;
        if shape.numel() == 0 {
            return Ok(Tensor::zeros(shape.param_dims(), params.dtype(), params.device())?);
        }
        let Split {
            shape,
            mean,
            log_var,
        } = self.split(shape, params)?;
        tracing::trace!(
            "gaussian gradient: batch={}, size={}, afn={}",
            shape.batch,
            shape.size,
            self.activation
        );

        let variance = log_var.exp()?;
        let diff = x.sub(&mean)?;
        let diff_sq = diff.sqr()?;

        let dl_dmean = diff.div(&variance)?;

        // Differentiate w.r.t. σ, then dσ/d(log σ²) = σ/2
        let sigma = variance.sqrt()?;
        let sigma3 = variance.powf(1.5)?;
        let dl_dsigma = sigma.recip()?.neg()?.add(&diff_sq.div(&sigma3)?)?;
        let dl_dlog_var = sigma.affine(0.5, 0.0)?.mul(&dl_dsigma)?;

        let grad = Tensor::cat(&[&dl_dmean, &dl_dlog_var], 1)?;

        if self.activation.is_identity() {
            return Ok(grad);
        }

        let activation_grad = self.activation.derivative(params)?;
        Ok(grad.mul(&activation_grad)?)
    }

    fn generate_at_mean(&self, params: &Tensor) -> Result<Tensor> {
        let shape = ParamShape::of_params(params)?;
        let output = self.activation.apply(params)?;
        Ok(output.narrow(1, 0, shape.size)?)
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }
}

impl fmt::Display for GaussianReconstructionDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GaussianReconstructionDistribution(afn={})", self.activation)
    }
}

fn sum_f64(t: &Tensor) -> Result<f64> {
    Ok(t.to_dtype(DType::F64)?.sum_all()?.to_scalar::<f64>()?)
}
