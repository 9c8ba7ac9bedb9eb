use super::TraitLayer;
use crate::nn::NnError;
use crate::tensor::Tensor;

/// 展平层：[batch, d1, d2, ...] -> [batch, d1*d2*...]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flatten;

impl TraitLayer for Flatten {
    fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        Ok(x.flatten_from(1)?)
    }

    fn describe(&self) -> String {
        "Flatten".to_string()
    }
}
