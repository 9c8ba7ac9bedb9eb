/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 张量的只读属性：形状、维数、元素个数及只读视图
 */

use super::Tensor;
use ndarray::ArrayViewD;

impl Tensor {
    /// 只读视图，供网络层直接用ndarray做卷积、池化等计算
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    /// 转为行优先（C order）的连续内存布局，已是该布局时不拷贝。
    /// 载入的权重可能来自转置等非连续视图，存入参数前先整理一次
    pub fn into_standard_layout(self) -> Self {
        if self.data.is_standard_layout() {
            return self;
        }
        Self {
            data: self.data.as_standard_layout().into_owned(),
        }
    }

    /// 卷积网络里常见的形状：[N, C, H, W]的图像批、[N, F]的特征、[C]的逐通道参数
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 维数，即`shape()`的长度
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 形状是否严格一致，[1, 4]与[4]视为不一致
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 元素总数
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 按行优先顺序拷贝出所有元素
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 是否所有元素都等于`value`，测试里用来核对常数初始化
    pub fn all_eq(&self, value: f32) -> bool {
        self.data.iter().all(|&x| x == value)
    }
}
