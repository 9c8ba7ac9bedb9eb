/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 负责神经网络（neural network）的构建：网络层、层序列容器、参数初始化与层堆叠构建器
 */

mod builder;
mod error;
pub mod functional;
mod init;
pub mod layer;
mod module;
mod parameter;
mod sequential;
mod state_dict;

pub use builder::{FeatureExtractor, LayerConfig, LayerToken, VGG16, VGG16_POOLED, make_layers};
pub use error::NnError;
pub use init::{FanMode, Init, InitPolicy, LayerKind, ParamInit, fans};
pub use layer::{
    AvgPool2d, BatchNorm2d, Conv2d, Flatten, Layer, Linear, MaxPool2d, ReLU, TraitLayer,
};
pub use module::Module;
pub use parameter::Parameter;
pub use sequential::Sequential;
pub use state_dict::StateDict;

#[cfg(test)]
mod tests;
