use super::NnError;
use crate::tensor::Tensor;

/// 层内的一个具名张量：可训练参数（weight、bias）或统计量缓冲（running_mean等）。
/// 名称与PyTorch的`state_dict`键的最后一段一致，便于加载预训练权重。
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: &'static str,
    value: Tensor,
}

impl Parameter {
    pub fn new(name: &'static str, value: Tensor) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> &Tensor {
        &self.value
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    pub fn size(&self) -> usize {
        self.value.size()
    }

    /// 替换参数值，新值形状必须与原值一致。`key`仅用于报错。
    pub fn set_value(&mut self, key: &str, value: Tensor) -> Result<(), NnError> {
        if !self.value.is_same_shape(&value) {
            return Err(NnError::WeightShape {
                key: key.to_string(),
                expected: self.shape().to_vec(),
                got: value.shape().to_vec(),
            });
        }
        self.value = value.into_standard_layout();
        Ok(())
    }

    /// 形状由参数自身决定的重新赋值（初始化时使用）
    pub(in crate::nn) fn overwrite(&mut self, value: Tensor) {
        debug_assert!(self.value.is_same_shape(&value));
        self.value = value;
    }
}
