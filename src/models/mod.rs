/*
 * @Author       : 老董
 * @Date         : 2026-03-09
 * @Description  : 三种图像分类网络：VGG变体、B-CNN、LeNet5，以及预训练权重仓库与配置驱动的构建
 */

mod backbone;
mod bcnn;
mod config;
mod dataset;
mod error;
mod lenet;
mod vgg;
mod zoo;

pub use backbone::{FEATURES_PREFIX, pretrained_vgg16};
pub use bcnn::{BCNN_IN_CHANNELS, Bcnn};
pub use config::{DatasetSource, Model, ModelConfig};
pub use dataset::{Dataset, DatasetConfig};
pub use error::ModelError;
pub use lenet::LeNet5;
pub use vgg::Vgg;
pub use zoo::{DirectoryZoo, MemoryZoo, ModelZoo, PretrainedModel};

#[cfg(test)]
mod tests;
