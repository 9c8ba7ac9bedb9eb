//! # aoi_cnn
//!
//! 用纯rust定义几种用于图像分类的卷积网络结构：
//! - [`models::Vgg`]：只保留一个全连接层的VGG变体；
//! - [`models::Bcnn`]：均值场双线性池化CNN（B-CNN）；
//! - [`models::LeNet5`]：经典LeNet5。
//!
//! 其中VGG变体和LeNet5针对6分类的`aoi`数据集。
//! 本库只负责网络结构（层的组合）与参数初始化，仅支持前向推理；
//! 训练、数据加载、模型保存等均不在本库范围内。
//!

pub mod errors;
pub mod models;
pub mod nn;
pub mod tensor;
pub mod utils;
