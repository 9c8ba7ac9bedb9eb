use crate::nn::{
    FanMode, Init, InitPolicy, Layer, LayerConfig, LayerKind, Linear, ParamInit, TraitLayer, fans,
    make_layers,
};
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn std_of(data: &[f32]) -> f32 {
    let mean = data.iter().sum::<f32>() / data.len() as f32;
    (data.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / data.len() as f32).sqrt()
}

#[test]
fn test_fans() {
    assert_eq!(fans(&[64, 3, 3, 3]), (27, 576));
    assert_eq!(fans(&[6, 4]), (4, 6));
    assert_eq!(fans(&[10]), (10, 10));
}

#[test]
fn test_kaiming_normal_fan_out_std() {
    let mut rng = StdRng::seed_from_u64(42);
    let shape = [256, 64, 3, 3];
    let tensor = Init::KaimingNormal {
        mode: FanMode::FanOut,
    }
    .generate_with_rng(&shape, &mut rng);
    assert_eq!(tensor.shape(), &shape);
    // √(2 / (kh·kw·out))
    let expected = (2.0f32 / (3 * 3 * 256) as f32).sqrt();
    let std = std_of(&tensor.to_vec());
    assert_abs_diff_eq!(std, expected, epsilon = expected * 0.05);
}

#[test]
fn test_constant_inits() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(Init::Zeros.generate_with_rng(&[3, 3], &mut rng).all_eq(0.));
    assert!(Init::Ones.generate_with_rng(&[4], &mut rng).all_eq(1.));
    let half = Init::Constant(0.5).generate_with_rng(&[2, 2], &mut rng);
    assert!(half.all_eq(0.5));
    let Init::Uniform { low, high } = Init::default_for_fan_in(16) else {
        panic!("默认初始化应为均匀分布");
    };
    assert_eq!((low, high), (-0.25, 0.25));
}

#[test]
fn test_vgg_policy_on_stack() {
    let mut rng = StdRng::seed_from_u64(1);
    let cfg: LayerConfig = "8, M, 16".parse().unwrap();
    let mut extractor = make_layers(&cfg, 3, true, &mut rng);
    extractor
        .layers_mut()
        .apply_init(&InitPolicy::vgg(), &mut rng);

    for layer in extractor.layers().iter() {
        match layer {
            Layer::Conv2d(conv) => assert!(conv.bias().unwrap().value().all_eq(0.)),
            Layer::BatchNorm2d(bn) => {
                assert!(bn.weight().value().all_eq(0.5));
                assert!(bn.bias().value().all_eq(0.));
            }
            _ => assert!(layer.kind().is_none()),
        }
    }
}

#[test]
fn test_bcnn_policy_on_stack() {
    let mut rng = StdRng::seed_from_u64(2);
    let cfg: LayerConfig = "8, 16, M".parse().unwrap();
    let mut extractor = make_layers(&cfg, 3, true, &mut rng);
    // 先施加VGG策略（BN scale为0.5），确认B-CNN策略会重新写入
    extractor
        .layers_mut()
        .apply_init(&InitPolicy::vgg(), &mut rng);
    extractor
        .layers_mut()
        .apply_init(&InitPolicy::bcnn(), &mut rng);

    let bn_weights = extractor
        .layers()
        .iter()
        .filter_map(|layer| match layer {
            Layer::BatchNorm2d(bn) => Some(bn.weight().value().clone()),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(bn_weights.len(), 2);
    assert!(bn_weights.iter().all(|w| w.all_eq(1.)));
}

#[test]
fn test_fully_connected_rules() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut linear = Linear::new(100, 10, true, &mut rng);
    let before = linear.weight().value().clone();

    // B-CNN：只将bias置0，weight保持默认值
    InitPolicy::bcnn().apply_to(&mut linear, &mut rng);
    assert_eq!(linear.weight().value(), &before);
    assert!(linear.bias().unwrap().value().all_eq(0.));

    // VGG：weight ~ N(0, 0.01²)
    let mut linear = Linear::new(512, 200, true, &mut rng);
    InitPolicy::vgg().apply_to(&mut linear, &mut rng);
    let std = std_of(&linear.weight().value().to_vec());
    assert_abs_diff_eq!(std, 0.01, epsilon = 5e-4);
    assert!(linear.bias().unwrap().value().all_eq(0.));
}

#[test]
fn test_policy_rules_by_kind() {
    let vgg = InitPolicy::vgg();
    assert_eq!(
        vgg.rule(LayerKind::Normalization),
        &ParamInit::new(Some(Init::Constant(0.5)), Some(Init::Zeros))
    );
    assert_eq!(
        InitPolicy::bcnn().rule(LayerKind::FullyConnected),
        &ParamInit::new(None, Some(Init::Zeros))
    );
}
