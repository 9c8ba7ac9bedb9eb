/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : BatchNorm2d 层（推理模式）
 *
 * y = γ · (x - running_mean) / √(running_var + eps) + β，逐通道计算。
 * 只在推理模式下工作：使用统计量缓冲而不是当前 batch 的统计量，也不更新统计量。
 */

use super::{TraitLayer, expect_4d};
use crate::nn::{LayerKind, NnError, Parameter};
use crate::tensor::Tensor;
use ndarray::Axis;

pub const BATCH_NORM_EPS: f32 = 1e-5;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchNorm2d {
    /// γ [num_features]
    weight: Parameter,
    /// β [num_features]
    bias: Parameter,
    running_mean: Parameter,
    running_var: Parameter,
    num_features: usize,
    eps: f32,
}

impl BatchNorm2d {
    /// 创建时γ=1、β=0，统计量为均值0、方差1（即恒等变换）
    pub fn new(num_features: usize) -> Self {
        Self {
            weight: Parameter::new("weight", Tensor::ones(&[num_features])),
            bias: Parameter::new("bias", Tensor::zeros(&[num_features])),
            running_mean: Parameter::new("running_mean", Tensor::zeros(&[num_features])),
            running_var: Parameter::new("running_var", Tensor::ones(&[num_features])),
            num_features,
            eps: BATCH_NORM_EPS,
        }
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> &Parameter {
        &self.bias
    }

    pub fn running_mean(&self) -> &Parameter {
        &self.running_mean
    }

    pub fn running_var(&self) -> &Parameter {
        &self.running_var
    }
}

impl TraitLayer for BatchNorm2d {
    fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let (_, channels, _, _) = expect_4d(x, "BatchNorm2d")?;
        if channels != self.num_features {
            return Err(NnError::ShapeMismatch {
                expected: vec![self.num_features],
                got: vec![channels],
                message: format!(
                    "BatchNorm2d 输入通道数 {channels} 与特征数 {} 不匹配",
                    self.num_features
                ),
            });
        }

        // 折算为逐通道的 scale 与 shift
        let gamma = self.weight.value().to_vec();
        let beta = self.bias.value().to_vec();
        let mean = self.running_mean.value().to_vec();
        let var = self.running_var.value().to_vec();
        let (scale, shift): (Vec<f32>, Vec<f32>) = (0..channels)
            .map(|c| {
                let scale = gamma[c] / (var[c] + self.eps).sqrt();
                (scale, beta[c] - mean[c] * scale)
            })
            .unzip();

        let mut output = x.view().to_owned();
        for (c, mut plane) in output.axis_iter_mut(Axis(1)).enumerate() {
            plane.mapv_inplace(|v| v * scale[c] + shift[c]);
        }
        Ok(Tensor::from_array(output))
    }

    fn describe(&self) -> String {
        format!("BatchNorm2d({})", self.num_features)
    }

    fn kind(&self) -> Option<LayerKind> {
        Some(LayerKind::Normalization)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        vec![&self.weight, &self.bias]
    }

    fn state(&self) -> Vec<&Parameter> {
        vec![
            &self.weight,
            &self.bias,
            &self.running_mean,
            &self.running_var,
        ]
    }

    fn state_mut(&mut self) -> Vec<&mut Parameter> {
        vec![
            &mut self.weight,
            &mut self.bias,
            &mut self.running_mean,
            &mut self.running_var,
        ]
    }

    fn weight_mut(&mut self) -> Option<&mut Parameter> {
        Some(&mut self.weight)
    }

    fn bias_mut(&mut self) -> Option<&mut Parameter> {
        Some(&mut self.bias)
    }
}
