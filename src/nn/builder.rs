/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : 按配置逐层堆叠卷积特征提取器（VGG 风格）
 *
 * 配置是一串记号：整数表示一个卷积阶段的输出通道数，`M` 表示在此处下采样。
 * 从左到右处理每个记号，同时维护“当前输入通道数”：
 * - `M`  -> 追加 2×2、步长 2 的最大池化，通道数不变
 * - `w`  -> 追加 3×3、步长 1、填充 1、带偏置的卷积（当前通道 -> w），
 *           若需要归一化则追加 BatchNorm2d(w)，再追加 ReLU；当前通道数变为 w
 */

use super::layer::{BatchNorm2d, Conv2d, Layer, MaxPool2d, ReLU};
use super::{Module, NnError, Parameter, Sequential};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use tracing::{debug, trace};

use LayerToken::{Conv, MaxPool};

/// 配置中的单个记号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawToken", into = "RawToken")]
pub enum LayerToken {
    /// 卷积阶段，值为输出通道数
    Conv(usize),
    /// 下采样（2×2 最大池化）
    MaxPool,
}

/// JSON 中的记号既可以是整数也可以是字符串`"M"`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawToken {
    Width(usize),
    Marker(String),
}

impl TryFrom<RawToken> for LayerToken {
    type Error = NnError;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        match raw {
            RawToken::Width(0) => Err(NnError::InvalidConfig("卷积通道数须大于0".to_string())),
            RawToken::Width(width) => Ok(Conv(width)),
            RawToken::Marker(marker) => marker.parse(),
        }
    }
}

impl From<LayerToken> for RawToken {
    fn from(token: LayerToken) -> Self {
        match token {
            Conv(width) => RawToken::Width(width),
            MaxPool => RawToken::Marker("M".to_string()),
        }
    }
}

impl FromStr for LayerToken {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("m") {
            return Ok(MaxPool);
        }
        match s.parse::<usize>() {
            Ok(0) => Err(NnError::InvalidConfig("卷积通道数须大于0".to_string())),
            Ok(width) => Ok(Conv(width)),
            Err(_) => Err(NnError::InvalidConfig(format!("无法识别的记号`{s}`"))),
        }
    }
}

impl Display for LayerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conv(width) => write!(f, "{width}"),
            MaxPool => write!(f, "M"),
        }
    }
}

/// VGG16 的13层卷积配置（不含最后的pool5）
pub const VGG16: &[LayerToken] = &[
    Conv(64),
    Conv(64),
    MaxPool,
    Conv(128),
    Conv(128),
    MaxPool,
    Conv(256),
    Conv(256),
    Conv(256),
    MaxPool,
    Conv(512),
    Conv(512),
    Conv(512),
    MaxPool,
    Conv(512),
    Conv(512),
    Conv(512),
];

/// 完整的 VGG16 特征部分配置（含最后的pool5），与预训练模型的层序号一一对应
pub const VGG16_POOLED: &[LayerToken] = &[
    Conv(64),
    Conv(64),
    MaxPool,
    Conv(128),
    Conv(128),
    MaxPool,
    Conv(256),
    Conv(256),
    Conv(256),
    MaxPool,
    Conv(512),
    Conv(512),
    Conv(512),
    MaxPool,
    Conv(512),
    Conv(512),
    Conv(512),
    MaxPool,
];

/// 层配置：有序的记号序列，完全决定了所构建的特征提取器
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerConfig(Vec<LayerToken>);

impl LayerConfig {
    pub fn new(tokens: Vec<LayerToken>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[LayerToken] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 卷积记号的个数
    pub fn num_convs(&self) -> usize {
        self.0.iter().filter(|t| matches!(t, Conv(_))).count()
    }

    /// 下采样记号的个数
    pub fn num_pools(&self) -> usize {
        self.0.iter().filter(|t| matches!(t, MaxPool)).count()
    }

    /// 最后一个卷积阶段的输出通道数
    pub fn last_width(&self) -> Option<usize> {
        self.0.iter().rev().find_map(|t| match t {
            Conv(width) => Some(*width),
            MaxPool => None,
        })
    }

    /// 检查所有卷积通道数均大于0（直接构造的`Conv(0)`不会经过解析时的检查）
    pub fn validate(&self) -> Result<(), NnError> {
        if self.0.contains(&Conv(0)) {
            return Err(NnError::InvalidConfig("卷积通道数须大于0".to_string()));
        }
        Ok(())
    }
}

impl From<&[LayerToken]> for LayerConfig {
    fn from(tokens: &[LayerToken]) -> Self {
        Self(tokens.to_vec())
    }
}

/// 以逗号或空白分隔，如`"64, 64, M, 128"`
impl FromStr for LayerConfig {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Display for LayerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = self.0.iter().map(ToString::to_string).collect::<Vec<_>>();
        write!(f, "[{}]", tokens.join(", "))
    }
}

/// 特征提取器：按配置构建的层序列，及其最终输出通道数
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureExtractor {
    layers: Sequential,
    out_channels: usize,
}

impl FeatureExtractor {
    pub fn new(layers: Sequential, out_channels: usize) -> Self {
        Self {
            layers,
            out_channels,
        }
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        self.layers.forward(x)
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub fn layers(&self) -> &Sequential {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Sequential {
        &mut self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// 移除末尾的下采样阶段（若有），返回是否移除
    pub fn drop_trailing_pool(&mut self) -> bool {
        if matches!(self.layers.last(), Some(Layer::MaxPool2d(_))) {
            self.layers.pop();
            return true;
        }
        false
    }

    /// 移除末尾的下采样阶段及其之前的激活（各自若有）。
    /// 输出通道数不变：被移除的都是不改变通道数的层。
    pub fn drop_trailing_pool_stage(&mut self) {
        self.drop_trailing_pool();
        if matches!(self.layers.last(), Some(Layer::ReLU(_))) {
            self.layers.pop();
        }
    }
}

impl Module for FeatureExtractor {
    fn named_state(&self) -> Vec<(String, &Parameter)> {
        self.layers.named_state()
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.layers.parameters()
    }
}

/// 按配置构建特征提取器。
///
/// 层数 = 卷积记号数 × (2 或 3，视`batch_norm`而定) + 下采样记号数；
/// 空配置得到空的层序列，输出通道数即`in_channels`。本函数本身不做校验，也不会失败。
pub fn make_layers(
    cfg: &LayerConfig,
    in_channels: usize,
    batch_norm: bool,
    rng: &mut StdRng,
) -> FeatureExtractor {
    let mut layers = Sequential::new();
    let mut channels = in_channels;
    for token in cfg.tokens() {
        match *token {
            MaxPool => layers.push(MaxPool2d::new((2, 2), Some((2, 2)))),
            Conv(width) => {
                let conv = Conv2d::new(channels, width, (3, 3), (1, 1), (1, 1), true, rng);
                layers.push(conv);
                if batch_norm {
                    layers.push(BatchNorm2d::new(width));
                }
                layers.push(ReLU);
                channels = width;
            }
        }
    }
    debug!(
        "按配置{cfg}构建特征提取器：{}个卷积，{}个下采样，共{}层，输出通道数{channels}",
        cfg.num_convs(),
        cfg.num_pools(),
        layers.len()
    );
    trace!("特征提取器结构：\n{}", layers.describe());
    FeatureExtractor::new(layers, channels)
}
