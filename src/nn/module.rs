/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Module trait 定义
 */

use super::{Parameter, StateDict};

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（各模型前向时的中间变换各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - `named_state()` 返回带PyTorch风格键名的全部状态，其余方法由它推出
pub trait Module {
    /// 全部具名状态（可训练参数 + 统计量缓冲），键名如`features.0.weight`
    fn named_state(&self) -> Vec<(String, &Parameter)>;

    /// 获取所有可训练参数
    fn parameters(&self) -> Vec<&Parameter>;

    /// 可训练参数的标量总数
    fn num_params(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }

    /// 导出为权重字典（拷贝）
    fn state_dict(&self) -> StateDict {
        self.named_state()
            .into_iter()
            .map(|(key, param)| (key, param.value().clone()))
            .collect()
    }
}
