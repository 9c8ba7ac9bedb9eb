use crate::tensor::Tensor;

// 逐元素运算，结果形状与输入一致
impl Tensor {
    /// 对每个元素施加函数`f`
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Tensor {
        Tensor {
            data: self.data.mapv(f),
        }
    }

    /// max(x, 0)
    pub fn relu(&self) -> Tensor {
        self.map(|x| x.max(0.))
    }

    /// 符号函数：正数为1，负数为-1，零为0（与PyTorch的`torch.sign`一致）
    pub fn sign(&self) -> Tensor {
        self.map(|x| {
            if x > 0. {
                1.
            } else if x < 0. {
                -1.
            } else {
                0.
            }
        })
    }

    /// 带符号的平方根：sign(x) * sqrt(|x| + eps)。
    /// `eps`用于稳定接近零的值。
    pub fn signed_sqrt(&self, eps: f32) -> Tensor {
        let sign = self.sign();
        let root = self.map(|x| (x.abs() + eps).sqrt());
        Tensor {
            data: sign.data * root.data,
        }
    }

    /// 除以一个纯数。`scalar`为0时结果为inf/NaN，由调用方负责
    pub fn div_scalar(&self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data / scalar,
        }
    }
}
