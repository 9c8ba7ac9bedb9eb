use crate::assert_err;
use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

#[test]
fn test_batch_mat_mul_with_own_transpose() {
    // 每个样本 X·Xᵀ
    let x = Tensor::new(&[1., 2., 3., 4., 0., 1., 1., 0.], &[2, 2, 2]);
    let xt = x.permute(&[0, 2, 1]).unwrap();
    let gram = x.batch_mat_mul(&xt).unwrap();
    assert_eq!(gram.shape(), &[2, 2, 2]);
    assert_eq!(gram.to_vec(), vec![5., 11., 11., 25., 1., 0., 0., 1.]);
}

#[test]
fn test_batch_mat_mul_shape_mismatch() {
    let a = Tensor::zeros(&[2, 2, 3]);
    let b = Tensor::zeros(&[3, 3, 2]);
    assert_err!(
        a.batch_mat_mul(&b),
        TensorError::OperatorError {
            operator: Operator::BatchMatMul,
            ..
        }
    );
}
