/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : Layer 模块 - 卷积网络用到的基本层（仅前向推理）
 *
 * 所有层的输入/输出均为 Batch-First 格式，卷积类张量为 [batch, C, H, W]。
 * 层种类是封闭的，统一收纳于 `Layer` 枚举中，由 enum_dispatch 静态分发。
 */

mod avg_pool2d;
mod batch_norm2d;
mod conv2d;
mod flatten;
mod linear;
mod max_pool2d;
mod relu;

pub use avg_pool2d::AvgPool2d;
pub use batch_norm2d::BatchNorm2d;
pub use conv2d::Conv2d;
pub use flatten::Flatten;
pub use linear::Linear;
pub use max_pool2d::MaxPool2d;
pub use relu::ReLU;

use super::{LayerKind, NnError, Parameter};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Conv2d(Conv2d),
    BatchNorm2d(BatchNorm2d),
    ReLU(ReLU),
    MaxPool2d(MaxPool2d),
    AvgPool2d(AvgPool2d),
    Flatten(Flatten),
    Linear(Linear),
}

#[enum_dispatch(Layer)]
pub trait TraitLayer {
    /// 前向计算
    fn forward(&self, x: &Tensor) -> Result<Tensor, NnError>;

    /// 层的简短描述，如`Conv2d(3→64, 3×3)`
    fn describe(&self) -> String;

    /// 参与初始化时所属的类别，无参数的层返回`None`
    fn kind(&self) -> Option<LayerKind> {
        None
    }

    /// 可训练参数
    fn parameters(&self) -> Vec<&Parameter> {
        Vec::new()
    }

    /// 全部具名状态（可训练参数 + 统计量缓冲），顺序与PyTorch的`state_dict`一致
    fn state(&self) -> Vec<&Parameter> {
        self.parameters()
    }

    fn state_mut(&mut self) -> Vec<&mut Parameter> {
        Vec::new()
    }

    fn weight_mut(&mut self) -> Option<&mut Parameter> {
        None
    }

    fn bias_mut(&mut self) -> Option<&mut Parameter> {
        None
    }
}

/// 校验输入为4阶张量 [batch, C, H, W]，返回各维大小
pub(in crate::nn) fn expect_4d(
    x: &Tensor,
    layer: &str,
) -> Result<(usize, usize, usize, usize), NnError> {
    match *x.shape() {
        [n, c, h, w] => Ok((n, c, h, w)),
        _ => Err(NnError::ShapeMismatch {
            expected: vec![0, 0, 0, 0],
            got: x.shape().to_vec(),
            message: format!("{layer} 需要 4D 输入 [batch, C, H, W]"),
        }),
    }
}

/// 2D 池化的公共实现：按窗口 (kH, kW)、步长 (sH, sW) 滑动，对每个窗口调用`reduce`
pub(in crate::nn) fn pool2d<F>(
    x: &Tensor,
    layer: &str,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    reduce: F,
) -> Result<Tensor, NnError>
where
    F: Fn(ndarray::ArrayView2<'_, f32>) -> f32,
{
    let (batch_size, channels, input_h, input_w) = expect_4d(x, layer)?;
    let (k_h, k_w) = kernel_size;
    let (s_h, s_w) = stride;

    if k_h > input_h || k_w > input_w {
        return Err(NnError::InvalidOperation(format!(
            "{layer} 池化窗口 {k_h}x{k_w} 超出输入尺寸 {input_h}x{input_w}"
        )));
    }
    let output_h = (input_h - k_h) / s_h + 1;
    let output_w = (input_w - k_w) / s_w + 1;

    let input = x
        .view()
        .into_dimensionality::<ndarray::Ix4>()
        .map_err(|e| NnError::InvalidOperation(format!("{layer} 输入无法视为 4D 数组：{e}")))?;
    let mut output = ndarray::Array4::<f32>::zeros((batch_size, channels, output_h, output_w));
    for ((b, c, oi, oj), out) in output.indexed_iter_mut() {
        let window = input.slice(ndarray::s![
            b,
            c,
            oi * s_h..oi * s_h + k_h,
            oj * s_w..oj * s_w + k_w
        ]);
        *out = reduce(window);
    }
    Ok(Tensor::from_array(output.into_dyn()))
}
