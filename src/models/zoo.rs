/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : 预训练模型仓库：按名称提供预训练主干网络的权重字典
 *
 * 权重键名沿用PyTorch的`state_dict`，如`features.0.weight`、`features.1.running_mean`。
 * `DirectoryZoo`在一个目录下按`<名称>.npz`、`<名称>.bin`的顺序查找：
 * - `.npz`：numpy的`np.savez`导出的归档，每个数组以键名命名；
 * - `.bin`：bincode序列化的`StateDict`。
 */

use super::ModelError;
use crate::nn::StateDict;
use crate::tensor::Tensor;
use ndarray::ArrayD;
use ndarray_npy::NpzReader;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

const SKIPPED_SUFFIX: &str = ".num_batches_tracked";

/// 可用的预训练主干
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PretrainedModel {
    Vgg16,
    Vgg16Bn,
}

impl PretrainedModel {
    /// 按是否需要批归一化选择VGG16主干
    pub fn vgg16(batch_norm: bool) -> Self {
        if batch_norm {
            Self::Vgg16Bn
        } else {
            Self::Vgg16
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vgg16 => "vgg16",
            Self::Vgg16Bn => "vgg16_bn",
        }
    }

    pub fn batch_norm(&self) -> bool {
        matches!(self, Self::Vgg16Bn)
    }
}

impl Display for PretrainedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 预训练权重的来源
pub trait ModelZoo {
    fn state_dict(&self, model: PretrainedModel) -> Result<StateDict, ModelError>;
}

/// 从本地目录读取预训练权重
#[derive(Debug, Clone)]
pub struct DirectoryZoo {
    root: PathBuf,
}

impl DirectoryZoo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_npz(path: &Path) -> Result<StateDict, ModelError> {
        let mut npz = NpzReader::new(File::open(path)?)?;
        let mut dict = StateDict::new();
        for name in npz.names()? {
            let key = name.strip_suffix(".npy").unwrap_or(&name).to_string();
            // BN的批次计数为int64，前向推理用不到
            if key.ends_with(SKIPPED_SUFFIX) {
                continue;
            }
            let array: ArrayD<f32> = npz.by_name(&name)?;
            dict.insert(key, Tensor::from_array(array));
        }
        Ok(dict)
    }

    fn read_bin(path: &Path) -> Result<StateDict, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

impl ModelZoo for DirectoryZoo {
    fn state_dict(&self, model: PretrainedModel) -> Result<StateDict, ModelError> {
        let npz = self.root.join(format!("{}.npz", model.name()));
        if npz.is_file() {
            debug!("从{}读取预训练权重", npz.display());
            return Self::read_npz(&npz);
        }
        let bin = self.root.join(format!("{}.bin", model.name()));
        if bin.is_file() {
            debug!("从{}读取预训练权重", bin.display());
            return Self::read_bin(&bin);
        }
        Err(ModelError::WeightsNotFound {
            model: model.name().to_string(),
            root: self.root.clone(),
        })
    }
}

/// 内存中的预训练权重
#[derive(Debug, Clone, Default)]
pub struct MemoryZoo {
    models: HashMap<PretrainedModel, StateDict>,
}

impl MemoryZoo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: PretrainedModel, dict: StateDict) {
        self.models.insert(model, dict);
    }

    pub fn with(mut self, model: PretrainedModel, dict: StateDict) -> Self {
        self.insert(model, dict);
        self
    }
}

impl ModelZoo for MemoryZoo {
    fn state_dict(&self, model: PretrainedModel) -> Result<StateDict, ModelError> {
        self.models
            .get(&model)
            .cloned()
            .ok_or_else(|| ModelError::WeightsNotFound {
                model: model.name().to_string(),
                root: PathBuf::from("<memory>"),
            })
    }
}

