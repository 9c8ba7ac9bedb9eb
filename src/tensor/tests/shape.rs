use crate::assert_err;
use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_reshape() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let reshaped = tensor.reshape(&[3, 2]).unwrap();
    assert_eq!(reshaped.shape(), &[3, 2]);
    assert_eq!(reshaped.to_vec(), tensor.to_vec());

    assert_err!(
        tensor.reshape(&[4, 2]),
        TensorError::IncompatibleShape { .. }
    );
}

#[test]
fn test_flatten_from() {
    let tensor = Tensor::zeros(&[2, 3, 4, 5]);
    assert_eq!(tensor.flatten_from(1).unwrap().shape(), &[2, 60]);
    assert_eq!(tensor.flatten_from(2).unwrap().shape(), &[2, 3, 20]);
    assert_err!(
        tensor.flatten_from(4),
        TensorError::ValueMustSatisfyComparison { .. }
    );
}

#[test]
fn test_permute_then_reshape_keeps_logical_order() {
    // [1, 2, 3] -> 转置后 [1, 3, 2]
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[1, 2, 3]);
    let permuted = tensor.permute(&[0, 2, 1]).unwrap();
    assert_eq!(permuted.shape(), &[1, 3, 2]);
    assert_eq!(permuted[[0, 2, 0]], 3.);
    assert_eq!(permuted[[0, 2, 1]], 6.);

    let flat = permuted.reshape(&[6]).unwrap();
    assert_eq!(flat.to_vec(), vec![1., 4., 2., 5., 3., 6.]);
}

#[test]
fn test_permute_invalid_axes() {
    let tensor = Tensor::zeros(&[2, 3]);
    assert_err!(tensor.permute(&[0]), TensorError::PermuteNeedAtLeast2Dims);
    assert_err!(
        tensor.permute(&[0, 0]),
        TensorError::PermuteNeedUniqueAndInRange
    );
    assert_err!(
        tensor.permute(&[0, 2]),
        TensorError::PermuteNeedUniqueAndInRange
    );
}
