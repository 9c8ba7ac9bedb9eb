use super::Tensor;
use crate::errors::{ComparisonOperator, TensorError};
use ndarray::IxDyn;
use std::collections::HashSet;

impl Tensor {
    /// 在元素总数不变的前提下改变形状
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        let new_total_elements: usize = shape.iter().product();
        if self.size() != new_total_elements {
            return Err(TensorError::IncompatibleShape {
                from: self.shape().to_vec(),
                to: shape.to_vec(),
            });
        }
        // 非连续内存（如permute之后）需要先拷贝为标准布局
        let data = self
            .data
            .as_standard_layout()
            .into_owned()
            .into_shape(IxDyn(shape))
            .map_err(|_| TensorError::IncompatibleShape {
                from: self.shape().to_vec(),
                to: shape.to_vec(),
            })?;
        Ok(Self { data })
    }

    /// 将第`start_dim`维及之后的所有维度展平为一维。
    /// 如形状为[N, C, H, W]的张量调用`flatten_from(1)`后形状为[N, C*H*W]。
    pub fn flatten_from(&self, start_dim: usize) -> Result<Self, TensorError> {
        let dims = self.dimension();
        if start_dim >= dims {
            return Err(TensorError::ValueMustSatisfyComparison {
                value_name: "张量维数".to_string(),
                operator: ComparisonOperator::GreaterThan,
                threshold: start_dim,
            });
        }
        let mut new_shape = self.shape()[..start_dim].to_vec();
        new_shape.push(self.shape()[start_dim..].iter().product());
        self.reshape(&new_shape)
    }

    /// 按`axes`重新排列维度，如形状[N, C, P]按[0, 2, 1]排列后为[N, P, C]
    pub fn permute(&self, axes: &[usize]) -> Result<Self, TensorError> {
        if axes.len() < 2 {
            return Err(TensorError::PermuteNeedAtLeast2Dims);
        }
        let unique_axes = axes.iter().copied().collect::<HashSet<_>>();
        if unique_axes.len() != axes.len()
            || axes.len() != self.dimension()
            || axes.iter().any(|&a| a >= self.dimension())
        {
            return Err(TensorError::PermuteNeedUniqueAndInRange);
        }
        Ok(Self {
            data: self.data.clone().permuted_axes(IxDyn(axes)),
        })
    }
}
