/*
 * @Author       : 老董
 * @Date         : 2026-03-13
 * @Description  : 由JSON配置构建模型
 *
 * 以`model`字段区分模型种类，例如：
 * {"model": "vgg", "dataset": "aoi", "pretrained": false, "batch_norm": true, "cfg": [64, "M", 128]}
 * {"model": "bcnn", "num_classes": 200, "pretrained": true, "batch_norm": false}
 * {"model": "lenet5", "dataset": "aoi", "seed": 42}
 */

use super::dataset::RawDatasetConfig;
use super::{Bcnn, Dataset, DatasetConfig, LeNet5, ModelError, ModelZoo, Vgg};
use crate::nn::{LayerConfig, Module, NnError, Parameter};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// 数据集：既可以是已知数据集的名称，也可以直接给出各项尺寸
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatasetSource {
    Named(String),
    Custom(DatasetConfig),
}

/// 先按形状区分两种写法，再校验尺寸，使校验失败的原因能传到调用方
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDatasetSource {
    Named(String),
    Custom(RawDatasetConfig),
}

impl<'de> Deserialize<'de> for DatasetSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDatasetSource::deserialize(deserializer)? {
            RawDatasetSource::Named(name) => Ok(Self::Named(name)),
            RawDatasetSource::Custom(raw) => DatasetConfig::try_from(raw)
                .map(Self::Custom)
                .map_err(de::Error::custom),
        }
    }
}

impl DatasetSource {
    fn resolve(&self, preset: fn(Dataset) -> DatasetConfig) -> Result<DatasetConfig, ModelError> {
        match self {
            Self::Named(name) => Ok(preset(name.parse()?)),
            Self::Custom(config) => Ok(*config),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum ModelConfig {
    Vgg {
        dataset: DatasetSource,
        #[serde(default = "default_true")]
        pretrained: bool,
        #[serde(default)]
        cfg: Option<LayerConfig>,
        #[serde(default = "default_true")]
        batch_norm: bool,
        #[serde(default)]
        seed: Option<u64>,
    },
    Bcnn {
        num_classes: usize,
        #[serde(default = "default_true")]
        pretrained: bool,
        #[serde(default)]
        cfg: Option<LayerConfig>,
        #[serde(default = "default_true")]
        batch_norm: bool,
        #[serde(default)]
        seed: Option<u64>,
    },
    LeNet5 {
        dataset: DatasetSource,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    fn rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// 构建模型。只有预训练的构建方式会访问`zoo`
    pub fn build(&self, zoo: &dyn ModelZoo) -> Result<Model, ModelError> {
        match self {
            Self::Vgg {
                dataset,
                pretrained,
                cfg,
                batch_norm,
                seed,
            } => {
                let dataset = dataset.resolve(DatasetConfig::vgg)?;
                let mut rng = Self::rng(*seed);
                let model = if *pretrained {
                    reject_custom_cfg(cfg.as_ref())?;
                    Vgg::pretrained(dataset, *batch_norm, zoo, &mut rng)?
                } else {
                    Vgg::from_scratch(dataset, cfg.as_ref(), *batch_norm, &mut rng)?
                };
                Ok(Model::Vgg(model))
            }
            Self::Bcnn {
                num_classes,
                pretrained,
                cfg,
                batch_norm,
                seed,
            } => {
                let mut rng = Self::rng(*seed);
                let model = if *pretrained {
                    reject_custom_cfg(cfg.as_ref())?;
                    Bcnn::pretrained(*num_classes, *batch_norm, zoo, &mut rng)?
                } else {
                    Bcnn::from_scratch(*num_classes, cfg.as_ref(), *batch_norm, &mut rng)?
                };
                Ok(Model::Bcnn(model))
            }
            Self::LeNet5 { dataset, seed } => {
                let dataset = dataset.resolve(DatasetConfig::lenet5)?;
                Ok(Model::LeNet5(LeNet5::new(dataset, &mut Self::rng(*seed))))
            }
        }
    }
}

/// 预训练主干的层序号须与权重键名一一对应，故不接受自定义配置
fn reject_custom_cfg(cfg: Option<&LayerConfig>) -> Result<(), ModelError> {
    match cfg {
        Some(cfg) => Err(ModelError::InvalidConfig(format!(
            "预训练主干的结构是固定的，不能同时指定配置{cfg}"
        ))),
        None => Ok(()),
    }
}

/// 三种模型之一
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Vgg(Vgg),
    Bcnn(Bcnn),
    LeNet5(LeNet5),
}

impl Model {
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        match self {
            Self::Vgg(model) => model.forward(x),
            Self::Bcnn(model) => model.forward(x),
            Self::LeNet5(model) => model.forward(x),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vgg(_) => "vgg",
            Self::Bcnn(_) => "bcnn",
            Self::LeNet5(_) => "lenet5",
        }
    }
}

impl Module for Model {
    fn named_state(&self) -> Vec<(String, &Parameter)> {
        match self {
            Self::Vgg(model) => model.named_state(),
            Self::Bcnn(model) => model.named_state(),
            Self::LeNet5(model) => model.named_state(),
        }
    }

    fn parameters(&self) -> Vec<&Parameter> {
        match self {
            Self::Vgg(model) => model.parameters(),
            Self::Bcnn(model) => model.parameters(),
            Self::LeNet5(model) => model.parameters(),
        }
    }
}
