/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 张量运算的错误类型。网络层、模型层的错误见`nn::NnError`与`models::ModelError`
 */

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error(
        "形状不一致，无法{operator}：左侧{tensor1_shape:?}，右侧{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    #[error("张量形状不兼容：无法将形状{from:?}变为{to:?}")]
    IncompatibleShape { from: Vec<usize>, to: Vec<usize> },
    #[error("数据长度{data_len}与形状{shape:?}不符")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },
    #[error("重排维度时张量至少需要2维")]
    PermuteNeedAtLeast2Dims,
    #[error("重排维度的下标须互不相同，且都在[0, <张量维数>)范围内")]
    PermuteNeedUniqueAndInRange,
}

/// 需要两个张量形状配合的运算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    BatchMatMul,
}

impl Operator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BatchMatMul => "批量矩阵相乘",
        }
    }
}

/// 校验维数等数值时用到的比较关系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterThan,
    Equal,
}

impl ComparisonOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::Equal => "==",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
