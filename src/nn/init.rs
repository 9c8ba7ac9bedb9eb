/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 参数初始化
 *
 * 初始化策略以“数据”的形式描述：每种层类别（卷积、归一化、全连接）对应一条
 * `ParamInit` 规则，`Sequential::apply_init` 按层类别一次遍历完成初始化，
 * 不需要在运行时判断具体的层类型。
 */

use super::layer::TraitLayer;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 计算扇入/扇出时使用的一侧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    FanIn,
    FanOut,
}

/// 参数初始化方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// [low, high]上的均匀分布
    Uniform { low: f32, high: f32 },
    /// Kaiming/He 正态初始化（针对`ReLU`，增益为√2）：N(0, 2/fan)
    KaimingNormal { mode: FanMode },
}

impl Init {
    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::full(*v, shape),
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
            Self::Uniform { low, high } => Tensor::uniform_with_rng(*low, *high, shape, rng),
            Self::KaimingNormal { mode } => {
                let (fan_in, fan_out) = fans(shape);
                let fan = match mode {
                    FanMode::FanIn => fan_in,
                    FanMode::FanOut => fan_out,
                };
                let std = (2.0 / fan as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
        }
    }

    /// 卷积层、全连接层在未指定初始化时的默认方式：U(-1/√fan_in, 1/√fan_in)，
    /// weight与bias共用同一个界限（同PyTorch）
    pub fn default_for_fan_in(fan_in: usize) -> Self {
        let bound = 1.0 / (fan_in.max(1) as f32).sqrt();
        Self::Uniform {
            low: -bound,
            high: bound,
        }
    }
}

/// 按PyTorch的约定计算权重的(fan_in, fan_out)：
/// 形状为[out, in, k...]时，fan_in = in·∏k，fan_out = out·∏k
pub fn fans(shape: &[usize]) -> (usize, usize) {
    match shape.len() {
        0 => (1, 1),
        1 => (shape[0], shape[0]),
        _ => {
            let receptive_field: usize = shape[2..].iter().product();
            (shape[1] * receptive_field, shape[0] * receptive_field)
        }
    }
}

/// 参与初始化的层类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Convolution,
    Normalization,
    FullyConnected,
}

/// 一类层的weight/bias初始化规则，`None`表示保留当前值
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParamInit {
    pub weight: Option<Init>,
    pub bias: Option<Init>,
}

impl ParamInit {
    pub const fn new(weight: Option<Init>, bias: Option<Init>) -> Self {
        Self { weight, bias }
    }

    /// 将本规则施加到某一层的weight与bias上（无对应参数时忽略）
    pub fn apply<L: TraitLayer>(&self, layer: &mut L, rng: &mut StdRng) {
        if let (Some(init), Some(weight)) = (self.weight, layer.weight_mut()) {
            let value = init.generate_with_rng(weight.shape(), rng);
            weight.overwrite(value);
        }
        if let (Some(init), Some(bias)) = (self.bias, layer.bias_mut()) {
            let value = init.generate_with_rng(bias.shape(), rng);
            bias.overwrite(value);
        }
    }
}

/// 整个模型的初始化策略：每个层类别一条规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitPolicy {
    pub convolution: ParamInit,
    pub normalization: ParamInit,
    pub fully_connected: ParamInit,
}

impl InitPolicy {
    /// VGG从头训练时的初始化：
    /// - 卷积weight ~ N(0, 2/(kh·kw·out))，bias为0
    /// - BN的scale为0.5，offset为0
    /// - 全连接weight ~ N(0, 0.01²)，bias为0
    pub const fn vgg() -> Self {
        Self {
            convolution: ParamInit::new(
                Some(Init::KaimingNormal {
                    mode: FanMode::FanOut,
                }),
                Some(Init::Zeros),
            ),
            normalization: ParamInit::new(Some(Init::Constant(0.5)), Some(Init::Zeros)),
            fully_connected: ParamInit::new(
                Some(Init::Normal {
                    mean: 0.0,
                    std: 0.01,
                }),
                Some(Init::Zeros),
            ),
        }
    }

    /// B-CNN从头训练时的初始化：
    /// - 卷积weight为fan_out模式的Kaiming正态初始化，bias为0
    /// - BN的scale为1，offset为0
    /// - 全连接只将bias置0，weight保留默认值
    pub const fn bcnn() -> Self {
        Self {
            convolution: ParamInit::new(
                Some(Init::KaimingNormal {
                    mode: FanMode::FanOut,
                }),
                Some(Init::Zeros),
            ),
            normalization: ParamInit::new(Some(Init::Ones), Some(Init::Zeros)),
            fully_connected: ParamInit::new(None, Some(Init::Zeros)),
        }
    }

    pub fn rule(&self, kind: LayerKind) -> &ParamInit {
        match kind {
            LayerKind::Convolution => &self.convolution,
            LayerKind::Normalization => &self.normalization,
            LayerKind::FullyConnected => &self.fully_connected,
        }
    }

    /// 对单个层施加与其类别相符的规则
    pub fn apply_to<L: TraitLayer>(&self, layer: &mut L, rng: &mut StdRng) {
        if let Some(kind) = layer.kind() {
            self.rule(kind).apply(layer, rng);
        }
    }
}
