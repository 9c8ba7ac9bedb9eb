/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 2D 最大池化层
 *
 * - 输入：[batch, C, H, W]
 * - 输出：[batch, C, H', W']，H' = (H - kH) / sH + 1
 */

use super::{TraitLayer, pool2d};
use crate::nn::NnError;
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPool2d {
    kernel_size: (usize, usize),
    stride: (usize, usize),
}

impl MaxPool2d {
    /// `stride`为`None`时默认等于`kernel_size`
    pub fn new(kernel_size: (usize, usize), stride: Option<(usize, usize)>) -> Self {
        Self {
            kernel_size,
            stride: stride.unwrap_or(kernel_size),
        }
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub fn stride(&self) -> (usize, usize) {
        self.stride
    }
}

impl TraitLayer for MaxPool2d {
    fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        pool2d(x, "MaxPool2d", self.kernel_size, self.stride, |window| {
            window.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v))
        })
    }

    fn describe(&self) -> String {
        format!(
            "MaxPool2d({}×{}, stride={:?})",
            self.kernel_size.0, self.kernel_size.1, self.stride
        )
    }
}
