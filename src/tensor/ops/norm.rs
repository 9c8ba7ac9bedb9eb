use crate::errors::{ComparisonOperator, TensorError};
use crate::tensor::Tensor;
use ndarray::{Axis, Ix2};

impl Tensor {
    /// 计算2阶张量每一行的L2范数，返回形状为[rows]的张量
    pub fn row_l2_norms(&self) -> Result<Tensor, TensorError> {
        let matrix = self.as_matrix()?;
        let norms = matrix.map_axis(Axis(1), |row| row.dot(&row).sqrt());
        Ok(Tensor {
            data: norms.into_dyn(),
        })
    }

    /// 将2阶张量的每一行缩放为单位L2范数：x / max(‖x‖₂, eps)
    /// （同PyTorch的`F.normalize(x, p=2, dim=1)`）
    pub fn l2_normalize_rows(&self, eps: f32) -> Result<Tensor, TensorError> {
        let mut matrix = self.as_matrix()?.to_owned();
        for mut row in matrix.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt().max(eps);
            row.mapv_inplace(|x| x / norm);
        }
        Ok(Tensor {
            data: matrix.into_dyn(),
        })
    }

    fn as_matrix(&self) -> Result<ndarray::ArrayView2<'_, f32>, TensorError> {
        self.data
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| TensorError::ValueMustSatisfyComparison {
                value_name: "张量维数".to_string(),
                operator: ComparisonOperator::Equal,
                threshold: 2,
            })
    }
}
