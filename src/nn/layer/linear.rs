/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : Linear (全连接) 层
 *
 * PyTorch 风格：weight 形状为 [out_features, in_features]，output = x @ Wᵀ + b
 */

use super::TraitLayer;
use crate::nn::{Init, LayerKind, NnError, Parameter};
use crate::tensor::Tensor;
use ndarray::{Ix1, Ix2};
use rand::rngs::StdRng;

/// Linear (全连接) 层
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    /// 权重参数 [out_features, in_features]
    weight: Parameter,
    /// 偏置参数 [out_features]（可选）
    bias: Option<Parameter>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// 创建新的 Linear 层，weight与bias采用默认的U(-1/√in, 1/√in)初始化
    pub fn new(in_features: usize, out_features: usize, use_bias: bool, rng: &mut StdRng) -> Self {
        let init = Init::default_for_fan_in(in_features);
        let weight = Parameter::new(
            "weight",
            init.generate_with_rng(&[out_features, in_features], rng),
        );
        let bias = use_bias.then(|| init.generate_with_rng(&[out_features], rng));
        let bias = bias.map(|value| Parameter::new("bias", value));
        Self {
            weight,
            bias,
            in_features,
            out_features,
        }
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }
}

impl TraitLayer for Linear {
    fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let batch = x.shape().first().copied().unwrap_or(0);
        let shape_error = || NnError::ShapeMismatch {
            expected: vec![batch, self.in_features],
            got: x.shape().to_vec(),
            message: format!(
                "Linear 输入必须是 [batch, {}]，分类头的输入宽度须等于展平后的特征宽度",
                self.in_features
            ),
        };
        let input = x
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| shape_error())?;
        if input.ncols() != self.in_features {
            return Err(shape_error());
        }
        let weight = self
            .weight
            .value()
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|e| NnError::InvalidOperation(format!("Linear 权重不是矩阵：{e}")))?;

        let mut output = input.dot(&weight.t());
        if let Some(ref bias) = self.bias {
            let bias = bias
                .value()
                .view()
                .into_dimensionality::<Ix1>()
                .map_err(|e| NnError::InvalidOperation(format!("Linear 偏置不是向量：{e}")))?;
            output += &bias;
        }
        Ok(Tensor::from_array(output.into_dyn()))
    }

    fn describe(&self) -> String {
        format!("Linear({}→{})", self.in_features, self.out_features)
    }

    fn kind(&self) -> Option<LayerKind> {
        Some(LayerKind::FullyConnected)
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
