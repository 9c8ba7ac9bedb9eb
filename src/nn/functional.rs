/*
 * @Author       : 老董
 * @Date         : 2026-03-07
 * @Description  : 无参数的函数式运算：双线性池化及其后的两步归一化
 */

use super::NnError;
use super::layer::expect_4d;
use crate::tensor::Tensor;

/// 带符号平方根中用于稳定接近零的值的常数
pub const SIGNED_SQRT_EPS: f32 = 1e-8;
/// L2归一化时范数的下限，避免除以0
pub const L2_NORM_EPS: f32 = 1e-12;

/// 均值场双线性池化：[N, C, H, W] -> [N, C²]
///
/// 每个样本先整理为 C×(H·W) 的矩阵 X，计算 X·Xᵀ / (H·W) 后按行展平。
pub fn bilinear_pool(x: &Tensor) -> Result<Tensor, NnError> {
    let (n, c, h, w) = expect_4d(x, "bilinear_pool")?;
    let positions = h * w;
    if positions == 0 {
        return Err(NnError::InvalidOperation("bilinear_pool 输入为空".into()));
    }
    let x = x.reshape(&[n, c, positions])?;
    let gram = x.batch_mat_mul(&x.permute(&[0, 2, 1])?)?;
    let gram = gram.div_scalar(positions as f32);
    Ok(gram.reshape(&[n, c * c])?)
}

/// sign(x)·√(|x| + eps)，逐元素
pub fn signed_sqrt(x: &Tensor) -> Tensor {
    x.signed_sqrt(SIGNED_SQRT_EPS)
}

/// 将[N, D]的每个样本缩放为单位L2范数
pub fn l2_normalize(x: &Tensor) -> Result<Tensor, NnError> {
    Ok(x.l2_normalize_rows(L2_NORM_EPS)?)
}
