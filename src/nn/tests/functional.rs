use crate::assert_err;
use crate::nn::NnError;
use crate::nn::functional::{bilinear_pool, l2_normalize, signed_sqrt};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_bilinear_pool_values() {
    // 通道0: [1, 2]，通道1: [3, 4]，空间尺寸 1×2
    let x = Tensor::new(&[1., 2., 3., 4.], &[1, 2, 1, 2]);
    let y = bilinear_pool(&x).unwrap();
    assert_eq!(y.shape(), &[1, 4]);
    // X·Xᵀ = [[5, 11], [11, 25]]，再除以位置数2
    for (actual, expected) in y.to_vec().iter().zip(&[2.5, 5.5, 5.5, 12.5]) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-6);
    }
}

#[test]
fn test_bilinear_pool_divides_by_actual_positions() {
    let x = Tensor::ones(&[2, 3, 5, 7]);
    let y = bilinear_pool(&x).unwrap();
    assert_eq!(y.shape(), &[2, 9]);
    for v in y.to_vec() {
        assert_abs_diff_eq!(v, 1., epsilon = 1e-6);
    }
}

#[test]
fn test_bilinear_pool_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(5);
    let x = Tensor::normal_with_rng(0., 1., &[2, 4, 3, 3], &mut rng);
    let y = bilinear_pool(&x).unwrap();
    assert_eq!(y.shape(), &[2, 16]);
    for n in 0..2 {
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!(y[[n, i * 4 + j]], y[[n, j * 4 + i]], epsilon = 1e-5);
            }
        }
    }
}

#[test]
fn test_bilinear_pool_needs_4d() {
    assert_err!(
        bilinear_pool(&Tensor::ones(&[2, 3, 4])),
        NnError::ShapeMismatch { .. }
    );
}

#[test]
fn test_signed_sqrt_preserves_sign() {
    let x = Tensor::new(&[-9., -1e-3, 0., 1e-3, 4., 16.], &[1, 6]);
    let y = signed_sqrt(&x);
    for (input, output) in x.to_vec().iter().zip(y.to_vec()) {
        if *input != 0. {
            assert_eq!(input.signum(), output.signum());
        }
    }
    assert_abs_diff_eq!(y[[0, 0]], -3., epsilon = 1e-5);
    assert_abs_diff_eq!(y[[0, 4]], 2., epsilon = 1e-5);
    assert_eq!(y[[0, 2]], 0.);
}

#[test]
fn test_l2_normalize_unit_norm() {
    let mut rng = StdRng::seed_from_u64(9);
    let x = Tensor::normal_with_rng(0., 3., &[4, 25], &mut rng);
    let y = l2_normalize(&x).unwrap();
    for norm in y.row_l2_norms().unwrap().to_vec() {
        assert_abs_diff_eq!(norm, 1., epsilon = 1e-5);
    }
}
