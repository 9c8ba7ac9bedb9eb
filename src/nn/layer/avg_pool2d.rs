/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 2D 平均池化层（无填充，窗口内取算术平均）
 */

use super::{TraitLayer, pool2d};
use crate::nn::NnError;
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvgPool2d {
    kernel_size: (usize, usize),
    stride: (usize, usize),
}

impl AvgPool2d {
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

impl TraitLayer for AvgPool2d {
    fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let area = (self.kernel_size.0 * self.kernel_size.1) as f32;
        pool2d(x, "AvgPool2d", self.kernel_size, self.stride, |window| {
            window.sum() / area
        })
    }

    fn describe(&self) -> String {
        format!(
            "AvgPool2d({}×{}, stride={:?})",
            self.kernel_size.0, self.kernel_size.1, self.stride
        )
    }
}
