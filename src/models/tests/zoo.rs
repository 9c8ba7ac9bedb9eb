use crate::assert_err;
use crate::models::{DirectoryZoo, MemoryZoo, ModelError, ModelZoo, PretrainedModel};
use crate::nn::StateDict;
use crate::tensor::Tensor;
use ndarray_npy::NpzWriter;
use std::fs::File;

fn tiny_dict() -> StateDict {
    [
        (
            "features.0.weight",
            Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]),
        ),
        ("features.0.bias", Tensor::new(&[0.5, -0.5], &[2])),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

#[test]
fn test_pretrained_model_names() {
    assert_eq!(PretrainedModel::vgg16(false), PretrainedModel::Vgg16);
    assert_eq!(PretrainedModel::vgg16(true), PretrainedModel::Vgg16Bn);
    assert_eq!(PretrainedModel::Vgg16.name(), "vgg16");
    assert_eq!(PretrainedModel::Vgg16Bn.to_string(), "vgg16_bn");
    assert!(PretrainedModel::Vgg16Bn.batch_norm());
}

#[test]
fn test_memory_zoo() {
    let zoo = MemoryZoo::new().with(PretrainedModel::Vgg16, tiny_dict());
    assert_eq!(zoo.state_dict(PretrainedModel::Vgg16).unwrap(), tiny_dict());
    assert_err!(
        zoo.state_dict(PretrainedModel::Vgg16Bn),
        ModelError::WeightsNotFound { model, .. } if model == "vgg16_bn"
    );
}

#[test]
fn test_directory_zoo_reads_bincode() {
    let dir = tempfile::tempdir().unwrap();
    let file = File::create(dir.path().join("vgg16.bin")).unwrap();
    bincode::serialize_into(file, &tiny_dict()).unwrap();

    let zoo = DirectoryZoo::new(dir.path());
    assert_eq!(zoo.root(), dir.path());
    assert_eq!(zoo.state_dict(PretrainedModel::Vgg16).unwrap(), tiny_dict());
}

#[test]
fn test_directory_zoo_reads_npz() {
    let dir = tempfile::tempdir().unwrap();
    let mut npz = NpzWriter::new(File::create(dir.path().join("vgg16_bn.npz")).unwrap());
    for (key, value) in &tiny_dict() {
        npz.add_array(key.as_str(), &value.view()).unwrap();
    }
    // PyTorch导出的BN计数是int64，读取时跳过
    npz.add_array("features.1.num_batches_tracked", &ndarray::arr0(7i64))
        .unwrap();
    npz.finish().unwrap();

    let zoo = DirectoryZoo::new(dir.path());
    let dict = zoo.state_dict(PretrainedModel::Vgg16Bn).unwrap();
    // 键名中的“.npy”后缀被去掉
    assert_eq!(dict, tiny_dict());
}

#[test]
fn test_directory_zoo_prefers_npz() {
    let dir = tempfile::tempdir().unwrap();
    let mut npz = NpzWriter::new(File::create(dir.path().join("vgg16.npz")).unwrap());
    npz.add_array("only_in_npz", &Tensor::ones(&[1]).view())
        .unwrap();
    npz.finish().unwrap();
    let file = File::create(dir.path().join("vgg16.bin")).unwrap();
    bincode::serialize_into(file, &tiny_dict()).unwrap();

    let dict = DirectoryZoo::new(dir.path())
        .state_dict(PretrainedModel::Vgg16)
        .unwrap();
    assert_eq!(dict.keys().collect::<Vec<_>>(), ["only_in_npz"]);
}

#[test]
fn test_directory_zoo_errors() {
    let dir = tempfile::tempdir().unwrap();
    let zoo = DirectoryZoo::new(dir.path());
    assert_err!(
        zoo.state_dict(PretrainedModel::Vgg16),
        ModelError::WeightsNotFound { root, .. } if root == dir.path()
    );

    std::fs::write(dir.path().join("vgg16.bin"), b"not bincode").unwrap();
    assert_err!(
        zoo.state_dict(PretrainedModel::Vgg16),
        ModelError::Bincode(_)
    );

    std::fs::write(dir.path().join("vgg16_bn.npz"), b"not a zip archive").unwrap();
    let result = zoo.state_dict(PretrainedModel::Vgg16Bn);
    assert_err!(result, ModelError::Npz(_));
}
