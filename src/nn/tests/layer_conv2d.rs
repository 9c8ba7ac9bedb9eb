/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : Conv2d 层单元测试（Batch-First 设计，含 PyTorch 数值对照）
 */

use crate::assert_err;
use crate::nn::{Conv2d, LayerKind, NnError, TraitLayer};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ==================== PyTorch 参考常量 ====================

// batch=1, C_in=1, H=4, W=4, C_out=2, kernel=2x2
#[rustfmt::skip]
const PYTORCH_FWD_X: &[f32] = &[
    1.0, 2.0, 3.0, 4.0,
    5.0, 6.0, 7.0, 8.0,
    9.0, 10.0, 11.0, 12.0,
    13.0, 14.0, 15.0, 16.0,
];
#[rustfmt::skip]
const PYTORCH_FWD_KERNEL: &[f32] = &[
    1.0, 0.0, 0.0, 1.0,  // filter 0: 对角线
    0.0, 1.0, 1.0, 0.0,  // filter 1: 反对角线
];
const PYTORCH_FWD_BIAS: &[f32] = &[0.5, -0.5];
#[rustfmt::skip]
const PYTORCH_FWD_OUTPUT: &[f32] = &[
    7.5, 9.5, 11.5,
    15.5, 17.5, 19.5,
    23.5, 25.5, 27.5,
    6.5, 8.5, 10.5,
    14.5, 16.5, 18.5,
    22.5, 24.5, 26.5,
];

fn conv_with(
    in_channels: usize,
    out_channels: usize,
    kernel_size: (usize, usize),
    padding: (usize, usize),
    kernel: &[f32],
    bias: Option<&[f32]>,
) -> Conv2d {
    let mut rng = StdRng::seed_from_u64(0);
    let mut conv = Conv2d::new(
        in_channels,
        out_channels,
        kernel_size,
        (1, 1),
        padding,
        bias.is_some(),
        &mut rng,
    );
    let shape = [out_channels, in_channels, kernel_size.0, kernel_size.1];
    conv.weight_mut()
        .unwrap()
        .set_value("weight", Tensor::new(kernel, &shape))
        .unwrap();
    if let Some(bias) = bias {
        conv.bias_mut()
            .unwrap()
            .set_value("bias", Tensor::new(bias, &[out_channels]))
            .unwrap();
    }
    conv
}

#[test]
fn test_conv2d_forward_pytorch_comparison() {
    let conv = conv_with(
        1,
        2,
        (2, 2),
        (0, 0),
        PYTORCH_FWD_KERNEL,
        Some(PYTORCH_FWD_BIAS),
    );
    let x = Tensor::new(PYTORCH_FWD_X, &[1, 1, 4, 4]);
    let y = conv.forward(&x).unwrap();
    assert_eq!(y.shape(), &[1, 2, 3, 3]);
    for (actual, expected) in y.to_vec().iter().zip(PYTORCH_FWD_OUTPUT) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-5);
    }
}

#[test]
fn test_conv2d_padding_keeps_spatial_size() {
    let conv = conv_with(1, 1, (3, 3), (1, 1), &[1.0; 9], None);
    let x = Tensor::ones(&[1, 1, 3, 3]);
    let y = conv.forward(&x).unwrap();
    assert_eq!(y.shape(), &[1, 1, 3, 3]);
    // 角上4个有效位置，边上6个，中心9个
    #[rustfmt::skip]
    let expected = [
        4., 6., 4.,
        6., 9., 6.,
        4., 6., 4.,
    ];
    assert_eq!(y.to_vec(), expected);
}

#[test]
fn test_conv2d_batch_samples_are_independent() {
    let conv = conv_with(
        1,
        2,
        (2, 2),
        (0, 0),
        PYTORCH_FWD_KERNEL,
        Some(PYTORCH_FWD_BIAS),
    );
    let mut data = PYTORCH_FWD_X.to_vec();
    data.extend_from_slice(&[0.; 16]);
    let y = conv.forward(&Tensor::new(&data, &[2, 1, 4, 4])).unwrap();
    assert_eq!(y.shape(), &[2, 2, 3, 3]);
    let y = y.to_vec();
    for (actual, expected) in y[..18].iter().zip(PYTORCH_FWD_OUTPUT) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-5);
    }
    // 全零输入只剩偏置
    assert!(y[18..27].iter().all(|&v| v == 0.5));
    assert!(y[27..].iter().all(|&v| v == -0.5));
}

#[test]
fn test_conv2d_stride() {
    let mut rng = StdRng::seed_from_u64(1);
    let conv = Conv2d::new(3, 8, (3, 3), (2, 2), (1, 1), true, &mut rng);
    assert_eq!(conv.output_size(224, 224), Some((112, 112)));
    let y = conv.forward(&Tensor::ones(&[2, 3, 8, 8])).unwrap();
    assert_eq!(y.shape(), &[2, 8, 4, 4]);
}

#[test]
fn test_conv2d_default_init_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    let conv = Conv2d::new(4, 16, (3, 3), (1, 1), (1, 1), true, &mut rng);
    let bound = 1. / ((4 * 3 * 3) as f32).sqrt();
    assert_eq!(conv.weight().shape(), &[16, 4, 3, 3]);
    assert_eq!(conv.bias().unwrap().shape(), &[16]);
    for v in conv.weight().value().to_vec() {
        assert!(v.abs() <= bound);
    }
    assert_eq!(conv.kind(), Some(LayerKind::Convolution));
    assert_eq!(conv.parameters().len(), 2);
}

#[test]
fn test_conv2d_without_bias() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut conv = Conv2d::new(1, 2, (3, 3), (1, 1), (0, 0), false, &mut rng);
    assert!(conv.bias().is_none());
    assert!(conv.bias_mut().is_none());
    assert_eq!(conv.parameters().len(), 1);
}

#[test]
fn test_conv2d_channel_mismatch() {
    let mut rng = StdRng::seed_from_u64(0);
    let conv = Conv2d::new(3, 4, (3, 3), (1, 1), (1, 1), true, &mut rng);
    assert_err!(
        conv.forward(&Tensor::ones(&[1, 1, 8, 8])),
        NnError::ShapeMismatch { expected, got, .. } if expected == &[3] && got == &[1]
    );
}

#[test]
fn test_conv2d_needs_4d_input() {
    let mut rng = StdRng::seed_from_u64(0);
    let conv = Conv2d::new(1, 4, (3, 3), (1, 1), (1, 1), true, &mut rng);
    assert_err!(
        conv.forward(&Tensor::ones(&[1, 8, 8])),
        NnError::ShapeMismatch { got, .. } if got == &[1, 8, 8]
    );
}

#[test]
fn test_conv2d_kernel_larger_than_input() {
    let mut rng = StdRng::seed_from_u64(0);
    let conv = Conv2d::new(1, 1, (5, 5), (1, 1), (0, 0), true, &mut rng);
    assert_err!(
        conv.forward(&Tensor::ones(&[1, 1, 3, 3])),
        NnError::InvalidOperation(_)
    );
}

#[test]
fn test_conv2d_set_value_rejects_wrong_shape() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut conv = Conv2d::new(1, 2, (3, 3), (1, 1), (1, 1), true, &mut rng);
    assert_err!(
        conv.weight_mut()
            .unwrap()
            .set_value("0.weight", Tensor::zeros(&[2, 1, 5, 5])),
        NnError::WeightShape { key, .. } if key == "0.weight"
    );
}
