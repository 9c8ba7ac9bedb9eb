/*
 * @Author       : 老董
 * @Date         : 2026-03-09
 * @Description  : 模型构建、预训练权重加载时的错误类型
 */

use crate::errors::TensorError;
use crate::nn::NnError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("未知的数据集`{0}`，目前只支持`aoi`")]
    UnknownDataset(String),
    #[error("模型配置无效：{0}")]
    InvalidConfig(String),
    #[error("预训练权重中缺少`{0}`")]
    MissingWeight(String),
    #[error("预训练权重`{key}`形状不符：期望{expected:?}，实际得到{got:?}")]
    WeightShape {
        key: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("在`{root}`下找不到预训练模型`{model}`的权重文件（.npz 或 .bin）")]
    WeightsNotFound { model: String, root: PathBuf },
    #[error("读取权重文件失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("解析npz权重失败：{0}")]
    Npz(#[from] ndarray_npy::ReadNpzError),
    #[error("解析bincode权重失败：{0}")]
    Bincode(#[from] bincode::Error),
    #[error("解析JSON配置失败：{0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Nn(NnError),
}

/// 将权重相关的错误提升为模型层面的错误，其余原样包装
impl From<NnError> for ModelError {
    fn from(err: NnError) -> Self {
        match err {
            NnError::MissingWeight(key) => Self::MissingWeight(key),
            NnError::WeightShape { key, expected, got } => Self::WeightShape { key, expected, got },
            NnError::InvalidConfig(message) => Self::InvalidConfig(message),
            other => Self::Nn(other),
        }
    }
}

impl From<TensorError> for ModelError {
    fn from(err: TensorError) -> Self {
        Self::Nn(NnError::Tensor(err))
    }
}
