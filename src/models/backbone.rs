/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @Description  : VGG16 主干网络：按需从预训练模型仓库载入权重
 */

use super::{ModelError, ModelZoo, PretrainedModel};
use crate::nn::{FeatureExtractor, LayerConfig, Module, VGG16_POOLED, make_layers};
use rand::rngs::StdRng;
use tracing::info;

/// 预训练主干的键名前缀，与PyTorch中`vgg16(...).features`一致
pub const FEATURES_PREFIX: &str = "features";

/// 构建完整的VGG16特征部分（含pool5）并载入预训练权重。
/// 层序号与预训练模型一一对应，调用方再按需裁掉末尾阶段。
pub fn pretrained_vgg16(
    batch_norm: bool,
    zoo: &dyn ModelZoo,
    rng: &mut StdRng,
) -> Result<FeatureExtractor, ModelError> {
    let model = PretrainedModel::vgg16(batch_norm);
    let dict = zoo.state_dict(model)?;
    let cfg = LayerConfig::from(VGG16_POOLED);
    let mut features = make_layers(&cfg, 3, model.batch_norm(), rng);
    features
        .layers_mut()
        .load_state_dict(FEATURES_PREFIX, &dict)?;
    info!(
        "已载入预训练主干{model}：{}个张量，{}个可训练参数",
        features.named_state().len(),
        features.num_params()
    );
    Ok(features)
}

/// 预训练主干只接受3通道输入
pub(in crate::models) fn ensure_rgb(in_channels: usize) -> Result<(), ModelError> {
    if in_channels != 3 {
        return Err(ModelError::InvalidConfig(format!(
            "预训练主干要求3通道输入，实际为{in_channels}"
        )));
    }
    Ok(())
}
