/*
 * @Author       : 老董
 * @Date         : 2026-03-11
 * @Description  : 只有一个全连接层的VGG变体
 *
 * 前向：特征提取 -> 2×2平均池化 -> 展平 -> Linear -> 各类别的原始得分（无激活）
 * 两种互斥的构建方式：
 * - 预训练：载入VGG16（或VGG16-BN）主干并去掉pool5，分类头保持默认初始化；
 * - 从头构建：按配置（缺省为13层卷积的VGG16，不含pool5）堆叠，再显式初始化全部参数。
 */

use super::backbone::{FEATURES_PREFIX, ensure_rgb, pretrained_vgg16};
use super::{Dataset, DatasetConfig, ModelError, ModelZoo};
use crate::nn::{
    AvgPool2d, FeatureExtractor, Flatten, InitPolicy, LayerConfig, Linear, Module, NnError,
    Parameter, TraitLayer, VGG16, make_layers,
};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use tracing::info;

/// 分类头的键名前缀
const CLASSIFIER_PREFIX: &str = "classifier";

#[derive(Debug, Clone, PartialEq)]
pub struct Vgg {
    dataset: DatasetConfig,
    features: FeatureExtractor,
    pool: AvgPool2d,
    flatten: Flatten,
    classifier: Linear,
}

impl Vgg {
    /// 按数据集名称从头构建默认结构，未知的数据集直接报错
    pub fn for_dataset(name: &str, batch_norm: bool, rng: &mut StdRng) -> Result<Self, ModelError> {
        let dataset = name.parse::<Dataset>()?;
        Self::from_scratch(DatasetConfig::vgg(dataset), None, batch_norm, rng)
    }

    /// 按配置从头构建并初始化。`cfg`为`None`时使用[`VGG16`]
    pub fn from_scratch(
        dataset: DatasetConfig,
        cfg: Option<&LayerConfig>,
        batch_norm: bool,
        rng: &mut StdRng,
    ) -> Result<Self, ModelError> {
        let cfg = cfg.cloned().unwrap_or_else(|| LayerConfig::from(VGG16));
        cfg.validate()?;
        let features = make_layers(&cfg, dataset.in_channels(), batch_norm, rng);
        let mut model = Self::assemble(dataset, features, rng);

        info!("初始化模型参数（VGG策略）");
        let policy = InitPolicy::vgg();
        model.features.layers_mut().apply_init(&policy, rng);
        policy.apply_to(&mut model.classifier, rng);
        info!("从头构建VGG：配置{cfg}，批归一化={batch_norm}");
        Ok(model)
    }

    /// 使用预训练的VGG16（`batch_norm`为真时为VGG16-BN）主干，去掉pool5
    pub fn pretrained(
        dataset: DatasetConfig,
        batch_norm: bool,
        zoo: &dyn ModelZoo,
        rng: &mut StdRng,
    ) -> Result<Self, ModelError> {
        ensure_rgb(dataset.in_channels())?;
        info!("使用预训练的VGG特征提取器");
        let mut features = pretrained_vgg16(batch_norm, zoo, rng)?;
        features.drop_trailing_pool();
        Ok(Self::assemble(dataset, features, rng))
    }

    fn assemble(dataset: DatasetConfig, features: FeatureExtractor, rng: &mut StdRng) -> Self {
        let classifier = Linear::new(dataset.feature_width(), dataset.num_classes(), true, rng);
        Self {
            dataset,
            features,
            pool: AvgPool2d::new((2, 2), None),
            flatten: Flatten,
            classifier,
        }
    }

    pub fn dataset(&self) -> &DatasetConfig {
        &self.dataset
    }

    pub fn features(&self) -> &FeatureExtractor {
        &self.features
    }

    pub fn classifier(&self) -> &Linear {
        &self.classifier
    }

    /// 分类头之前的展平特征 [N, feature_width]
    pub fn features_vector(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let x = self.features.forward(x)?;
        let x = self.pool.forward(&x)?;
        self.flatten.forward(&x)
    }

    /// [N, C, H, W] -> [N, num_classes]
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        self.classifier.forward(&self.features_vector(x)?)
    }
}

impl Module for Vgg {
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
