//! Elementwise activation functions applied to distribution parameters.
//!
//! A reconstruction distribution receives the raw (pre-activation) output of the
//! decoder. Each [`Activation`] provides both the forward transform and its
//! derivative evaluated at the pre-activation input, which the gradient needs for
//! the chain rule back through the transform.
//!
//! Identity and tanh are the usual choices for a Gaussian reconstruction. Tanh
//! bounds both the mean and the log-variance; asymmetric transforms such as
//! sigmoid or relu bias the log-variance and are rarely a good fit.

use std::fmt;
use std::str::FromStr;

use candle_core::Tensor;
use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// Negative-side slope used by [`Activation::LeakyRelu`].
pub const LEAKY_RELU_SLOPE: f64 = 0.01;

/// Elementwise activation applied to the packed distribution parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// f(x) = x
    #[default]
    Identity,
    /// f(x) = tanh(x)
    Tanh,
    /// f(x) = 1 / (1 + e^-x)
    Sigmoid,
    /// f(x) = max(0, x)
    Relu,
    /// f(x) = x for x > 0, 0.01x otherwise
    #[serde(alias = "leaky_relu")]
    LeakyRelu,
    /// f(x) = x for x > 0, e^x - 1 otherwise
    Elu,
    /// f(x) = ln(1 + e^x)
    Softplus,
    /// f(x) = x / (1 + |x|)
    Softsign,
    /// f(x) = clamp(x, -1, 1)
    #[serde(alias = "hard_tanh")]
    HardTanh,
    /// f(x) = x^3
    Cube,
}

impl Activation {
    /// Every supported activation.
    pub const ALL: [Self; 10] = [
        Self::Identity,
        Self::Tanh,
        Self::Sigmoid,
        Self::Relu,
        Self::LeakyRelu,
        Self::Elu,
        Self::Softplus,
        Self::Softsign,
        Self::HardTanh,
        Self::Cube,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Tanh => "tanh",
            Self::Sigmoid => "sigmoid",
            Self::Relu => "relu",
            Self::LeakyRelu => "leakyrelu",
            Self::Elu => "elu",
            Self::Softplus => "softplus",
            Self::Softsign => "softsign",
            Self::HardTanh => "hardtanh",
            Self::Cube => "cube",
        }
    }

    /// Whether this is the no-op identity transform.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Apply the activation elementwise, returning a new tensor.
    ///
    /// # Errors
    ///
    /// Returns error if tensor operations fail.
    pub fn apply(self, x: &Tensor) -> Result<Tensor> {
        let out = match self {
            Self::Identity => x.clone(),
            Self::Tanh => x.tanh()?,
            Self::Sigmoid => candle_nn::ops::sigmoid(x)?,
            Self::Relu => x.relu()?,
            Self::LeakyRelu => candle_nn::ops::leaky_relu(x, LEAKY_RELU_SLOPE)?,
            Self::Elu => x.elu(1.0)?,
            Self::Softplus => {
                // relu(x) + ln(1 + e^-|x|) keeps exp() from overflowing
                let tail = x.abs()?.neg()?.exp()?.affine(1.0, 1.0)?.log()?;
                x.relu()?.add(&tail)?
            }
            Self::Softsign => x.div(&x.abs()?.affine(1.0, 1.0)?)?,
            Self::HardTanh => x.clamp(-1.0f32, 1.0f32)?,
            Self::Cube => x.sqr()?.mul(x)?,
        };
        Ok(out)
    }

    /// Derivative of the activation, evaluated elementwise at the pre-activation `x`.
    ///
    /// # Errors
    ///
    /// Returns error if tensor operations fail.
    pub fn derivative(self, x: &Tensor) -> Result<Tensor> {
        let dtype = x.dtype();
        let out = match self {
            Self::Identity => x.ones_like()?,
            Self::Tanh => x.tanh()?.sqr()?.affine(-1.0, 1.0)?,
            Self::Sigmoid => {
                let s = candle_nn::ops::sigmoid(x)?;
                s.mul(&s.affine(-1.0, 1.0)?)?
            }
            Self::Softplus => candle_nn::ops::sigmoid(x)?,
            Self::Relu => x.gt(0.0f32)?.to_dtype(dtype)?,
            Self::LeakyRelu => x
                .gt(0.0f32)?
                .to_dtype(dtype)?
                .affine(1.0 - LEAKY_RELU_SLOPE, LEAKY_RELU_SLOPE)?,
            // 1 for x > 0, e^x otherwise
            Self::Elu => x.minimum(0.0f32)?.exp()?,
            Self::Softsign => x.abs()?.affine(1.0, 1.0)?.sqr()?.recip()?,
            Self::HardTanh => {
                let inside = x.gt(-1.0f32)?.mul(&x.lt(1.0f32)?)?;
                inside.to_dtype(dtype)?
            }
            Self::Cube => x.sqr()?.affine(3.0, 0.0)?,
        };
        Ok(out)
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activation {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| ReconError::UnknownActivation(s.to_string()))
    }
}
