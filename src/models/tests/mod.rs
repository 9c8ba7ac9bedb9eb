use crate::models::FEATURES_PREFIX;
use crate::nn::{LayerConfig, StateDict, VGG16_POOLED, make_layers};
use rand::SeedableRng;
use rand::rngs::StdRng;

mod zoo;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// 一份随机的VGG16（含pool5）特征部分权重，键名同PyTorch的`vgg16(...).state_dict()`
fn vgg16_weights(batch_norm: bool, seed: u64) -> StateDict {
    let features = make_layers(
        &LayerConfig::from(VGG16_POOLED),
        3,
        batch_norm,
        &mut rng(seed),
    );
    features
        .layers()
        .named_state_with_prefix(FEATURES_PREFIX)
        .into_iter()
        .map(|(key, param)| (key, param.value().clone()))
        .collect()
}
