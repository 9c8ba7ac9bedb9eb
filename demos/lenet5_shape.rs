/*
 * @Author       : 老董
 * @Date         : 2026-03-15
 * @Description  : 构建aoi数据集上的LeNet5，并打印单张1×224×224输入的输出形状
 *
 * 运行：cargo run --release --example lenet5_shape
 */

use aoi_cnn::models::LeNet5;
use aoi_cnn::nn::Module;
use aoi_cnn::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::from_default_env().add_directive("aoi_cnn=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut rng = StdRng::seed_from_u64(0);
    let net = LeNet5::for_dataset("aoi", &mut rng)?;
    println!("LeNet5 可训练参数：{}", net.num_params());

    let x = Tensor::uniform_with_rng(0., 1., &[1, 1, 224, 224], &mut rng);
    println!("特征图形状：{:?}", net.feature_map(&x)?.shape());
    let y = net.forward(&x)?;
    println!("输出形状：{:?}", y.shape());
    Ok(())
}
