/*
 * @Author       : 老董
 * @Date         : 2026-03-12
 * @Description  : 均值场双线性池化CNN（B-CNN）
 *
 * 输入 3×448×448 时主干输出 512×28×28，输入 3×224×224 时为 512×14×14。
 * 前向：主干（已去掉末尾的下采样阶段）-> ReLU -> 双线性池化 -> 带符号平方根
 *      -> 逐样本L2归一化 -> Linear(C² -> num_classes)
 */

use super::backbone::{FEATURES_PREFIX, pretrained_vgg16};
use super::{ModelError, ModelZoo};
use crate::nn::functional::{bilinear_pool, l2_normalize, signed_sqrt};
use crate::nn::{
    FeatureExtractor, InitPolicy, LayerConfig, Linear, Module, NnError, Parameter, ReLU,
    TraitLayer, VGG16_POOLED, make_layers,
};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use tracing::info;

/// B-CNN的主干固定接受RGB输入
pub const BCNN_IN_CHANNELS: usize = 3;

const CLASSIFIER_PREFIX: &str = "classifier";

#[derive(Debug, Clone, PartialEq)]
pub struct Bcnn {
    features: FeatureExtractor,
    relu: ReLU,
    classifier: Linear,
}

impl Bcnn {
    /// 以预训练的VGG16（`batch_norm`为真时为VGG16-BN）为主干
    pub fn pretrained(
        num_classes: usize,
        batch_norm: bool,
        zoo: &dyn ModelZoo,
        rng: &mut StdRng,
    ) -> Result<Self, ModelError> {
        ensure_classes(num_classes)?;
        let features = pretrained_vgg16(batch_norm, zoo, rng)?;
        info!("以预训练主干构建B-CNN，批归一化={batch_norm}");
        Ok(Self::assemble(num_classes, features, rng))
    }

    /// 按配置构建主干并初始化全部参数。`cfg`为`None`时使用含pool5的VGG16结构。
    /// 配置中至少要有一个卷积阶段，其最后一个卷积的宽度即双线性池化的通道数。
    /// 自定义配置只用于从头构建，`ModelConfig`中“预训练 + cfg”的组合会被拒绝（`InvalidConfig`）。
    pub fn from_scratch(
        num_classes: usize,
        cfg: Option<&LayerConfig>,
        batch_norm: bool,
        rng: &mut StdRng,
    ) -> Result<Self, ModelError> {
        ensure_classes(num_classes)?;
        let cfg = cfg
            .cloned()
            .unwrap_or_else(|| LayerConfig::from(VGG16_POOLED));
        cfg.validate()?;
        if cfg.last_width().is_none() {
            return Err(ModelError::InvalidConfig(format!("{cfg}中没有卷积阶段")));
        }
        let features = make_layers(&cfg, BCNN_IN_CHANNELS, batch_norm, rng);
        info!("按配置{cfg}构建B-CNN主干，批归一化={batch_norm}");

        let mut model = Self::assemble(num_classes, features, rng);
        let policy = InitPolicy::bcnn();
        model.features.layers_mut().apply_init(&policy, rng);
        policy.apply_to(&mut model.classifier, rng);
        info!("初始化模型参数（B-CNN策略）");
        Ok(model)
    }

    /// 裁掉主干末尾的下采样阶段，并接上输入宽度为C²的分类头
    fn assemble(num_classes: usize, mut features: FeatureExtractor, rng: &mut StdRng) -> Self {
        features.drop_trailing_pool_stage();
        let out_channels = features.out_channels();
        let classifier = Linear::new(out_channels * out_channels, num_classes, true, rng);
        Self {
            features,
            relu: ReLU,
            classifier,
        }
    }

    /// 主干的输出通道数C
    pub fn out_channels(&self) -> usize {
        self.features.out_channels()
    }

    pub fn num_classes(&self) -> usize {
        self.classifier.out_features()
    }

    pub fn features(&self) -> &FeatureExtractor {
        &self.features
    }

    pub fn classifier(&self) -> &Linear {
        &self.classifier
    }

    /// 分类前的特征向量 [N, C²]，每个样本的L2范数为1
    pub fn features_vector(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let x = self.features.forward(x)?;
        let x = self.relu.forward(&x)?;
        let x = bilinear_pool(&x)?;
        let x = signed_sqrt(&x);
        l2_normalize(&x)
    }

    /// [N, 3, H, W] -> [N, num_classes]
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        self.classifier.forward(&self.features_vector(x)?)
    }
}

impl Module for Bcnn {
    fn named_state(&self) -> Vec<(String, &Parameter)> {
        let mut state = self
            .features
            .layers()
            .named_state_with_prefix(FEATURES_PREFIX);
        state.extend(
            self.classifier
                .state()
                .into_iter()
                .map(|param| (format!("{CLASSIFIER_PREFIX}.{}", param.name()), param)),
        );
        state
    }

    fn parameters(&self) -> Vec<&Parameter> {
        let mut params = self.features.parameters();
        params.extend(self.classifier.parameters());
        params
    }
}

fn ensure_classes(num_classes: usize) -> Result<(), ModelError> {
    if num_classes == 0 {
        return Err(ModelError::InvalidConfig("num_classes须大于0".to_string()));
    }
    Ok(())
}
