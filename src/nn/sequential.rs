/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Sequential 容器：按顺序串联若干层，前一层的输出作为后一层的输入
 */

use super::layer::{Layer, TraitLayer};
use super::state_dict::{join_key, load_entry};
use super::{InitPolicy, Module, NnError, Parameter, StateDict};
use crate::tensor::Tensor;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
    }

    /// 移除并返回最后一层
    pub fn pop(&mut self) -> Option<Layer> {
        self.layers.pop()
    }

    pub fn last(&self) -> Option<&Layer> {
        self.layers.last()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// 依次执行各层的前向计算；空容器原样返回输入
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let mut layers = self.layers.iter();
        let Some(first) = layers.next() else {
            return Ok(x.clone());
        };
        let mut output = first.forward(x)?;
        for layer in layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// 按层类别一次遍历施加初始化策略
    pub fn apply_init(&mut self, policy: &InitPolicy, rng: &mut StdRng) {
        for layer in &mut self.layers {
            policy.apply_to(layer, rng);
        }
    }

    /// 带前缀的具名状态，键名为`{prefix}.{层序号}.{参数名}`
    pub fn named_state_with_prefix(&self, prefix: &str) -> Vec<(String, &Parameter)> {
        self.layers
            .iter()
            .enumerate()
            .flat_map(|(i, layer)| {
                layer
                    .state()
                    .into_iter()
                    .map(move |param| (join_key(prefix, i, param.name()), param))
            })
            .collect()
    }

    /// 从权重字典中加载全部状态。字典中多余的键被忽略，缺少的键或形状不符则报错
    pub fn load_state_dict(&mut self, prefix: &str, dict: &StateDict) -> Result<(), NnError> {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            for param in layer.state_mut() {
                let key = join_key(prefix, i, param.name());
                load_entry(dict, &key, param)?;
            }
        }
        Ok(())
    }

    /// 每层一行的结构描述
    pub fn describe(&self) -> String {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| format!("({i}): {}", layer.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Module for Sequential {
    fn named_state(&self) -> Vec<(String, &Parameter)> {
        self.named_state_with_prefix("")
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }
}
