/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 张量：基于ndarray的f32稠密多维数组，是本库所有网络层运算的数值基础
 */

use ndarray::{Array, ArrayD, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod ops {
    pub mod elementwise;
    pub mod mat_mul;
    pub mod norm;
}

mod index;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 卷积相关的张量一律采用Batch-First格式，即`[batch, C, H, W]`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic（可用`try_new`代替）。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        Self::try_new(data, shape).unwrap_or_else(|e| panic!("{e}"))
    }

    /// 同`new`，但以`Result`的形式返回形状错误
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Tensor, TensorError> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Tensor { data })
    }

    /// 直接由ndarray的动态维度数组构建张量
    pub fn from_array(data: ArrayD<f32>) -> Tensor {
        Tensor { data }
    }

    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: ArrayD::zeros(IxDyn(shape)),
        }
    }

    pub fn ones(shape: &[usize]) -> Tensor {
        Tensor {
            data: ArrayD::ones(IxDyn(shape)),
        }
    }

    /// 创建一个所有元素均为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Tensor {
        Tensor {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// 创建一个随机张量，其值服从[min, max]闭区间上的均匀分布
    pub fn uniform_with_rng<R: Rng + ?Sized>(
        min: f32,
        max: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        // 区间退化为一个点时直接填充，否则Uniform会panic
        if min >= max {
            return Self::full(min, shape);
        }
        let dist = Uniform::from(min..=max);
        Tensor {
            data: ArrayD::from_shape_simple_fn(IxDyn(shape), || dist.sample(&mut *rng)),
        }
    }

    /// 创建一个服从正态分布N(mean, std_dev²)的随机张量（Box-Muller变换）。
    pub fn normal_with_rng<R: Rng + ?Sized>(
        mean: f32,
        std_dev: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        // Box-Muller每次产生一对样本，第二个留作下次使用
        let mut spare: Option<f32> = None;
        let mut sample = || -> f32 {
            if let Some(z1) = spare.take() {
                return z1;
            }
            loop {
                let u1: f32 = rng.r#gen();
                let u2: f32 = rng.r#gen();
                let r = (-2.0 * u1.ln()).sqrt();
                let theta = 2.0 * std::f32::consts::PI * u2;
                let z0 = mean + std_dev * r * theta.cos();
                let z1 = mean + std_dev * r * theta.sin();
                if z0.is_finite() && z1.is_finite() {
                    spare = Some(z1);
                    return z0;
                }
            }
        };

        Tensor {
            data: ArrayD::from_shape_simple_fn(IxDyn(shape), &mut sample),
        }
    }
}
