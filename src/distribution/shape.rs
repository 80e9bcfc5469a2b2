//! Layout checks for packed distribution parameters.

use candle_core::Tensor;

use crate::error::{ReconError, Result};

/// Validated `[batch, size]` layout shared by the target data and the
/// `[batch, 2 * size]` packed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamShape {
    /// Number of examples (dimension 0).
    pub batch: usize,
    /// Number of data dimensions; the parameters hold `2 * size` columns.
    pub size: usize,
}

impl ParamShape {
    /// Check the packed parameters alone.
    ///
    /// # Errors
    ///
    /// Returns error if `params` is not rank 2 or its width is odd.
    pub fn of_params(params: &Tensor) -> Result<Self> {
        let (batch, width) = rank2("params", params)?;
        if width % 2 != 0 {
            return Err(ReconError::OddParameterWidth(width));
        }
        Ok(Self {
            batch,
            size: width / 2,
        })
    }

    /// Check the target data against the packed parameters.
    ///
    /// # Errors
    ///
    /// Returns error if either tensor is not rank 2, the parameter width is odd,
    /// `x` is not `[batch, width / 2]`, or the two tensors have different dtypes.
    pub fn infer(x: &Tensor, params: &Tensor) -> Result<Self> {
        let shape = Self::of_params(params)?;
        rank2("x", x)?;

        let expected = shape.data_dims();
        if x.dims() != expected.as_slice() {
            return Err(ReconError::ShapeMismatch {
                expected,
                actual: x.dims().to_vec(),
            });
        }

        if x.dtype() != params.dtype() {
            return Err(ReconError::DTypeMismatch {
                data: x.dtype(),
                params: params.dtype(),
            });
        }

        Ok(shape)
    }

    /// Shape of the target data, `[batch, size]`.
    #[must_use]
    pub fn data_dims(&self) -> Vec<usize> {
        vec![self.batch, self.size]
    }

    /// Shape of the packed parameters, `[batch, 2 * size]`.
    #[must_use]
    pub fn param_dims(&self) -> Vec<usize> {
        vec![self.batch, 2 * self.size]
    }

    /// Total number of data elements.
    #[must_use]
    pub const fn numel(&self) -> usize {
        self.batch * self.size
    }
}

fn rank2(name: &'static str, t: &Tensor) -> Result<(usize, usize)> {
    match *t.dims() {
        [rows, cols] => Ok((rows, cols)),
        ref dims => Err(ReconError::RankMismatch {
            name,
            expected: 2,
            actual: dims.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};

    #[test]
    fn test_infer_valid() {
        let device = Device::Cpu;
        let x = Tensor::zeros((4, 3), DType::F32, &device).unwrap();
        let params = Tensor::zeros((4, 6), DType::F32, &device).unwrap();

        let shape = ParamShape::infer(&x, &params).unwrap();
        assert_eq!(shape, ParamShape { batch: 4, size: 3 });
        assert_eq!(shape.param_dims(), vec![4, 6]);
        assert_eq!(shape.numel(), 12);
    }

    #[test]
    fn test_odd_width() {
        let device = Device::Cpu;
        let params = Tensor::zeros((2, 5), DType::F32, &device).unwrap();
        let err = ParamShape::of_params(&params).unwrap_err();
        assert!(matches!(err, ReconError::OddParameterWidth(5)));
    }

    #[test]
    fn test_rank_mismatch() {
        let device = Device::Cpu;
        let params = Tensor::zeros(6, DType::F32, &device).unwrap();
        let err = ParamShape::of_params(&params).unwrap_err();
        assert!(matches!(
            err,
            ReconError::RankMismatch {
                name: "params",
                expected: 2,
                actual: 1
            }
        ));

        let params = Tensor::zeros((2, 6), DType::F32, &device).unwrap();
        let x = Tensor::zeros((2, 3, 1), DType::F32, &device).unwrap();
        let err = ParamShape::infer(&x, &params).unwrap_err();
        assert!(matches!(err, ReconError::RankMismatch { name: "x", actual: 3, .. }));
    }

    #[test]
    fn test_feature_width_mismatch() {
        let device = Device::Cpu;
        let x = Tensor::zeros((2, 4), DType::F32, &device).unwrap();
        let params = Tensor::zeros((2, 6), DType::F32, &device).unwrap();

        match ParamShape::infer(&x, &params).unwrap_err() {
            ReconError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, vec![2, 3]);
                assert_eq!(actual, vec![2, 4]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_batch_mismatch() {
        let device = Device::Cpu;
        let x = Tensor::zeros((3, 3), DType::F32, &device).unwrap();
        let params = Tensor::zeros((2, 6), DType::F32, &device).unwrap();
        assert!(matches!(
            ParamShape::infer(&x, &params),
            Err(ReconError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_dtype_mismatch() {
        let device = Device::Cpu;
        let x = Tensor::zeros((2, 3), DType::F64, &device).unwrap();
        let params = Tensor::zeros((2, 6), DType::F32, &device).unwrap();
        assert!(matches!(
            ParamShape::infer(&x, &params),
            Err(ReconError::DTypeMismatch {
                data: DType::F64,
                params: DType::F32
            })
        ));
    }
}
