use super::TraitLayer;
use crate::nn::NnError;
use crate::tensor::Tensor;

/// ReLU 激活层：max(x, 0)。总是返回新张量，不修改输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReLU;

impl TraitLayer for ReLU {
    fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        Ok(x.relu())
    }

    fn describe(&self) -> String {
        "ReLU".to_string()
    }
}
