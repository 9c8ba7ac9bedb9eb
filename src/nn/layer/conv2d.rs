/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : Conv2d (2D 卷积) 层 - PyTorch 风格
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, out_channels, H', W']
 *
 * 输出尺寸计算：
 * H' = (H + 2*padding_h - kernel_h) / stride_h + 1
 * W' = (W + 2*padding_w - kernel_w) / stride_w + 1
 *
 * 计算：output = conv2d(x, K) + b
 * 实现：每个样本先 im2col 展开为 [C_in*kH*kW, H'*W']，再与 [C_out, C_in*kH*kW] 的卷积核矩阵相乘；
 *      使用 Rayon 在 batch 维度并行。
 */

use super::{TraitLayer, expect_4d};
use crate::nn::{Init, LayerKind, NnError, Parameter};
use crate::tensor::Tensor;
use ndarray::{Array2, Array4, ArrayView3, Axis, Ix4};
use rand::rngs::StdRng;
use rayon::prelude::*;

/// Conv2d (2D 卷积) 层
#[derive(Debug, Clone, PartialEq)]
pub struct Conv2d {
    /// 卷积核参数 [out_channels, in_channels, kernel_h, kernel_w]
    weight: Parameter,
    /// 偏置参数 [out_channels]（可选）
    bias: Option<Parameter>,
    in_channels: usize,
    out_channels: usize,
    /// (kernel_h, kernel_w)
    kernel_size: (usize, usize),
    /// (stride_h, stride_w)
    stride: (usize, usize),
    /// (padding_h, padding_w)
    padding: (usize, usize),
}

impl Conv2d {
    /// 创建新的 Conv2d 层，weight与bias采用默认的U(-1/√fan_in, 1/√fan_in)初始化
    ///
    /// # 参数
    /// - `in_channels`: 输入通道数
    /// - `out_channels`: 输出通道数
    /// - `kernel_size`: 卷积核大小 (kH, kW)
    /// - `stride`: 步长 (sH, sW)
    /// - `padding`: 填充 (pH, pW)
    /// - `use_bias`: 是否使用偏置
    /// - `rng`: 初始化用的随机数生成器
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        use_bias: bool,
        rng: &mut StdRng,
    ) -> Self {
        let (k_h, k_w) = kernel_size;
        let init = Init::default_for_fan_in(in_channels * k_h * k_w);

        let weight = Parameter::new(
            "weight",
            init.generate_with_rng(&[out_channels, in_channels, k_h, k_w], rng),
        );
        let bias = use_bias.then(|| init.generate_with_rng(&[out_channels], rng));
        let bias = bias.map(|value| Parameter::new("bias", value));

        Self {
            weight,
            bias,
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
        }
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub fn stride(&self) -> (usize, usize) {
        self.stride
    }

    pub fn padding(&self) -> (usize, usize) {
        self.padding
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }

    /// 根据输入的空间尺寸计算输出的空间尺寸
    pub fn output_size(&self, input_h: usize, input_w: usize) -> Option<(usize, usize)> {
        let (k_h, k_w) = self.kernel_size;
        let (s_h, s_w) = self.stride;
        let (p_h, p_w) = self.padding;
        let padded_h = input_h + 2 * p_h;
        let padded_w = input_w + 2 * p_w;
        if padded_h < k_h || padded_w < k_w {
            return None;
        }
        Some(((padded_h - k_h) / s_h + 1, (padded_w - k_w) / s_w + 1))
    }

    /// 将单个样本 [C, H, W] 展开为 [C*kH*kW, H'*W'] 的列矩阵，越界（填充）位置为0
    fn im2col(&self, sample: ArrayView3<'_, f32>, out_h: usize, out_w: usize) -> Array2<f32> {
        let (c, h, w) = sample.dim();
        let (k_h, k_w) = self.kernel_size;
        let (s_h, s_w) = self.stride;
        let (p_h, p_w) = self.padding;

        let mut cols = Array2::<f32>::zeros((c * k_h * k_w, out_h * out_w));
        for ci in 0..c {
            for ki in 0..k_h {
                for kj in 0..k_w {
                    let row = (ci * k_h + ki) * k_w + kj;
                    for oi in 0..out_h {
                        let y = (oi * s_h + ki) as isize - p_h as isize;
                        if y < 0 || y >= h as isize {
                            continue;
                        }
                        for oj in 0..out_w {
                            let x = (oj * s_w + kj) as isize - p_w as isize;
                            if x < 0 || x >= w as isize {
                                continue;
                            }
                            cols[[row, oi * out_w + oj]] = sample[[ci, y as usize, x as usize]];
                        }
                    }
                }
            }
        }
        cols
    }
}

impl TraitLayer for Conv2d {
    fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let (batch_size, input_c, input_h, input_w) = expect_4d(x, "Conv2d")?;
        if input_c != self.in_channels {
            return Err(NnError::ShapeMismatch {
                expected: vec![self.in_channels],
                got: vec![input_c],
                message: format!(
                    "输入通道数 {input_c} 与卷积核输入通道数 {} 不匹配",
                    self.in_channels
                ),
            });
        }
        let (out_h, out_w) = self.output_size(input_h, input_w).ok_or_else(|| {
            NnError::InvalidOperation(format!(
                "卷积输出尺寸无效：输入 {input_h}x{input_w}，核 {:?}，步长 {:?}，填充 {:?}",
                self.kernel_size, self.stride, self.padding
            ))
        })?;

        let input = x.view().into_dimensionality::<Ix4>().map_err(|e| {
            NnError::InvalidOperation(format!("Conv2d 输入无法视为 4D 数组：{e}"))
        })?;
        let kernel_cols = self.in_channels * self.kernel_size.0 * self.kernel_size.1;
        let kernel = self
            .weight
            .value()
            .view()
            .into_shape((self.out_channels, kernel_cols))
            .map_err(|e| NnError::InvalidOperation(format!("Conv2d 卷积核无法展平：{e}")))?;
        let bias = self.bias.as_ref().map(|b| b.value().to_vec());

        let mut output = Array4::<f32>::zeros((batch_size, self.out_channels, out_h, out_w));
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(b, mut out_sample)| {
                let cols = self.im2col(input.index_axis(Axis(0), b), out_h, out_w);
                let product = kernel.dot(&cols);
                for (oc, mut plane) in out_sample.outer_iter_mut().enumerate() {
                    let offset = bias.as_ref().map_or(0., |bias| bias[oc]);
                    for (dst, src) in plane.iter_mut().zip(product.row(oc)) {
                        *dst = src + offset;
                    }
                }
            });

        Ok(Tensor::from_array(output.into_dyn()))
    }

    fn describe(&self) -> String {
        format!(
            "Conv2d({}→{}, {}×{}, stride={:?}, padding={:?})",
            self.in_channels,
            self.out_channels,
            self.kernel_size.0,
            self.kernel_size.1,
            self.stride,
            self.padding
        )
    }

    fn kind(&self) -> Option<LayerKind> {
        Some(LayerKind::Convolution)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = vec![&self.weight];
        if let Some(ref bias) = self.bias {
            params.push(bias);
        }
        params
    }

    fn state_mut(&mut self) -> Vec<&mut Parameter> {
        let mut params = vec![&mut self.weight];
        if let Some(ref mut bias) = self.bias {
            params.push(bias);
        }
        params
    }

    fn weight_mut(&mut self) -> Option<&mut Parameter> {
        Some(&mut self.weight)
    }

    fn bias_mut(&mut self) -> Option<&mut Parameter> {
        self.bias.as_mut()
    }
}
