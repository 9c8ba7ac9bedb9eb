/*
 * @Author       : 老董
 * @Date         : 2026-03-12
 * @Description  : LeNet5
 *
 * 结构固定（以`aoi`为例，输入 1×224×224）：
 * - C1 Conv2d(1, 6, 5, padding=2) -> MaxPool2d(2) -> ReLU      224 -> 224 -> 112
 * - C3 Conv2d(6, 16, 5)           -> MaxPool2d(2) -> ReLU      112 -> 108 -> 54
 * - C5 Conv2d(16, 120, 5)                                      54 -> 50
 * - 展平为 120·50·50 -> F6 Linear(·, 84) -> ReLU -> Linear(84, 6)
 * 不做初始化覆盖，全部参数保持默认初始化。
 */

use super::{Dataset, DatasetConfig, ModelError};
use crate::nn::{Conv2d, Flatten, Linear, MaxPool2d, Module, NnError, Parameter, TraitLayer};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct LeNet5 {
    dataset: DatasetConfig,
    conv1: Conv2d,
    max_pool_1: MaxPool2d,
    conv2: Conv2d,
    max_pool_2: MaxPool2d,
    conv3: Conv2d,
    flatten: Flatten,
    fc1: Linear,
    fc2: Linear,
}

impl LeNet5 {
    /// 按数据集名称构建，未知的数据集直接报错
    pub fn for_dataset(name: &str, rng: &mut StdRng) -> Result<Self, ModelError> {
        let dataset = name.parse::<Dataset>()?;
        Ok(Self::new(DatasetConfig::lenet5(dataset), rng))
    }

    pub fn new(dataset: DatasetConfig, rng: &mut StdRng) -> Self {
        let model = Self {
            dataset,
            conv1: Conv2d::new(dataset.in_channels(), 6, (5, 5), (1, 1), (2, 2), true, rng),
            max_pool_1: MaxPool2d::new((2, 2), None),
            conv2: Conv2d::new(6, 16, (5, 5), (1, 1), (0, 0), true, rng),
            max_pool_2: MaxPool2d::new((2, 2), None),
            conv3: Conv2d::new(16, 120, (5, 5), (1, 1), (0, 0), true, rng),
            flatten: Flatten,
            fc1: Linear::new(dataset.feature_width(), 84, true, rng),
            fc2: Linear::new(84, dataset.num_classes(), true, rng),
        };
        info!(
            "构建LeNet5：输入通道{}，类别数{}，展平宽度{}",
            dataset.in_channels(),
            dataset.num_classes(),
            dataset.feature_width()
        );
        model
    }

    pub fn dataset(&self) -> &DatasetConfig {
        &self.dataset
    }

    /// 三个卷积阶段之后的特征图 [N, 120, H', W']
    pub fn feature_map(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let x = self.conv1.forward(x)?;
        let x = self.max_pool_1.forward(&x)?.relu();
        let x = self.conv2.forward(&x)?;
        let x = self.max_pool_2.forward(&x)?.relu();
        self.conv3.forward(&x)
    }

    /// [N, in_channels, H, W] -> [N, num_classes]
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let x = self.flatten.forward(&self.feature_map(x)?)?;
        let x = self.fc1.forward(&x)?.relu();
        self.fc2.forward(&x)
    }

    fn named_layers(&self) -> [(&'static str, &dyn TraitLayer); 5] {
        [
            ("conv1", &self.conv1),
            ("conv2", &self.conv2),
            ("conv3", &self.conv3),
            ("fc1", &self.fc1),
            ("fc2", &self.fc2),
        ]
    }
}

impl Module for LeNet5 {
    fn named_state(&self) -> Vec<(String, &Parameter)> {
        self.named_layers()
            .into_iter()
            .flat_map(|(prefix, layer)| {
                layer
                    .state()
                    .into_iter()
                    .map(move |param| (format!("{prefix}.{}", param.name()), param))
            })
            .collect()
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.named_layers()
            .into_iter()
            .flat_map(|(_, layer)| layer.parameters())
            .collect()
    }
}
