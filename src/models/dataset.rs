/*
 * @Author       : 老董
 * @Date         : 2026-03-09
 * @Description  : 数据集相关的配置：输入通道数、类别数、分类头输入宽度
 */

use super::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// 已知的数据集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// 6分类的AOI（自动光学检测）缺陷图像
    Aoi,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aoi => "aoi",
        }
    }
}

impl FromStr for Dataset {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aoi" => Ok(Self::Aoi),
            other => Err(ModelError::UnknownDataset(other.to_string())),
        }
    }
}

impl Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 与数据集相关的模型尺寸，三个字段均须大于0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDatasetConfig")]
pub struct DatasetConfig {
    in_channels: usize,
    num_classes: usize,
    feature_width: usize,
}

#[derive(Deserialize)]
pub(super) struct RawDatasetConfig {
    in_channels: usize,
    num_classes: usize,
    feature_width: usize,
}

impl TryFrom<RawDatasetConfig> for DatasetConfig {
    type Error = ModelError;

    fn try_from(raw: RawDatasetConfig) -> Result<Self, Self::Error> {
        Self::new(raw.in_channels, raw.num_classes, raw.feature_width)
    }
}

impl DatasetConfig {
    pub fn new(
        in_channels: usize,
        num_classes: usize,
        feature_width: usize,
    ) -> Result<Self, ModelError> {
        for (name, value) in [
            ("in_channels", in_channels),
            ("num_classes", num_classes),
            ("feature_width", feature_width),
        ] {
            if value == 0 {
                return Err(ModelError::InvalidConfig(format!("{name}须大于0")));
            }
        }
        Ok(Self {
            in_channels,
            num_classes,
            feature_width,
        })
    }

    /// VGG变体在某数据集上的尺寸：`aoi` -> (3, 6, 512·7·7)
    pub fn vgg(dataset: Dataset) -> Self {
        match dataset {
            Dataset::Aoi => Self {
                in_channels: 3,
                num_classes: 6,
                feature_width: 512 * 7 * 7,
            },
        }
    }

    /// LeNet5在某数据集上的尺寸：`aoi` -> (1, 6, 120·50·50)
    pub fn lenet5(dataset: Dataset) -> Self {
        match dataset {
            Dataset::Aoi => Self {
                in_channels: 1,
                num_classes: 6,
                feature_width: 120 * 50 * 50,
            },
        }
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// 分类头（或LeNet5的fc1）的输入宽度
    pub fn feature_width(&self) -> usize {
        self.feature_width
    }
}
