use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::{Array3, Axis, Ix3};

impl Tensor {
    /// 批量矩阵乘法：[N, A, B] × [N, B, C] -> [N, A, C]
    pub fn batch_mat_mul(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        let shape_error = || TensorError::OperatorError {
            operator: Operator::BatchMatMul,
            tensor1_shape: self.shape().to_vec(),
            tensor2_shape: other.shape().to_vec(),
        };
        let lhs = self
            .data
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|_| shape_error())?;
        let rhs = other
            .data
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|_| shape_error())?;
        let (n, a, b) = lhs.dim();
        let (rhs_n, rhs_b, c) = rhs.dim();
        if n != rhs_n || b != rhs_b {
            return Err(shape_error());
        }

        let mut out = Array3::<f32>::zeros((n, a, c));
        for ((mut out_i, lhs_i), rhs_i) in out
            .axis_iter_mut(Axis(0))
            .zip(lhs.axis_iter(Axis(0)))
            .zip(rhs.axis_iter(Axis(0)))
        {
            out_i.assign(&lhs_i.dot(&rhs_i));
        }
        Ok(Tensor {
            data: out.into_dyn(),
        })
    }
}
