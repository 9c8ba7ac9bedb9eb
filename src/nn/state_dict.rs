use super::{NnError, Parameter};
use crate::tensor::Tensor;
use std::collections::BTreeMap;

/// 权重字典：PyTorch风格的键（如`features.0.weight`）到张量的映射
pub type StateDict = BTreeMap<String, Tensor>;

/// 拼接键名，`prefix`为空时省略前缀
pub(in crate::nn) fn join_key(prefix: &str, index: usize, name: &str) -> String {
    if prefix.is_empty() {
        format!("{index}.{name}")
    } else {
        format!("{prefix}.{index}.{name}")
    }
}

/// 用字典中`key`对应的张量覆盖参数值
pub(in crate::nn) fn load_entry(
    dict: &StateDict,
    key: &str,
    param: &mut Parameter,
) -> Result<(), NnError> {
    let value = dict
        .get(key)
        .ok_or_else(|| NnError::MissingWeight(key.to_string()))?;
    param.set_value(key, value.clone())
}
