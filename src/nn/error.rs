/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : nn 模块的错误类型
 */

use crate::errors::TensorError;
use thiserror::Error;

/// 网络层前向计算、参数加载时的错误类型
#[derive(Error, Debug, PartialEq)]
pub enum NnError {
    #[error("{message}（期望形状{expected:?}，实际得到{got:?}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("{0}")]
    InvalidOperation(String),
    #[error("层配置无效：{0}")]
    InvalidConfig(String),
    #[error("权重字典中缺少`{0}`")]
    MissingWeight(String),
    #[error("权重`{key}`形状不符：期望{expected:?}，实际得到{got:?}")]
    WeightShape {
        key: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
