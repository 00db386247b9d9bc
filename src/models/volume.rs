//! # 剂量体积与结构掩膜数据模型
//!
//! 所有数组共享同一体素网格；引擎只读取，不修改输入数组。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `dvh/`, `commands/` 使用
//! - 使用 `ndarray` 存储三维数组

use crate::error::{DvhError, Result};

use ndarray::Array3;
use std::fmt;

/// 数据集标识（剂量计划或分割的编号）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<usize> for DatasetId {
    fn from(index: usize) -> Self {
        DatasetId(index.to_string())
    }
}

impl From<&str> for DatasetId {
    fn from(label: &str) -> Self {
        DatasetId(label.to_string())
    }
}

impl From<String> for DatasetId {
    fn from(label: String) -> Self {
        DatasetId(label)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 按插入顺序排列的数据集集合
#[derive(Debug, Clone)]
pub struct Datasets<T> {
    entries: Vec<(DatasetId, T)>,
}

impl<T> Default for Datasets<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Datasets<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加数据集，重复的 id 被拒绝
    pub fn insert(&mut self, id: DatasetId, value: T) -> Result<()> {
        if self.entries.iter().any(|(existing, _)| *existing == id) {
            return Err(DvhError::DuplicateDataset(id.to_string()));
        }
        self.entries.push((id, value));
        Ok(())
    }

    pub fn get(&self, id: &DatasetId) -> Option<&T> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DatasetId, &T)> {
        self.entries.iter().map(|(id, value)| (id, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 三维剂量分布（单位 Gy）
#[derive(Debug, Clone)]
pub struct DoseVolume {
    data: Array3<f64>,
}

impl DoseVolume {
    pub fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// 网格尺寸
    pub fn dim(&self) -> [usize; 3] {
        let (x, y, z) = self.data.dim();
        [x, y, z]
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// 最大有限剂量值，空数组返回 None
    pub fn max_dose(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }
}

/// 二值结构掩膜：体素值 > 0 即属于该结构
#[derive(Debug, Clone)]
pub struct StructureMask {
    data: Array3<bool>,
}

impl StructureMask {
    pub fn new(data: Array3<bool>) -> Self {
        Self { data }
    }

    /// 由原始体素值构建掩膜
    pub fn from_values(values: &Array3<f64>) -> Self {
        Self {
            data: values.mapv(|v| v > 0.0),
        }
    }

    pub fn dim(&self) -> [usize; 3] {
        let (x, y, z) = self.data.dim();
        [x, y, z]
    }

    pub fn data(&self) -> &Array3<bool> {
        &self.data
    }

    /// 结构内体素数
    pub fn voxel_count(&self) -> usize {
        self.data.iter().filter(|&&inside| inside).count()
    }
}

/// 一套分割：结构名 → 掩膜，保持插入顺序
#[derive(Debug, Clone, Default)]
pub struct StructureMaskSet {
    structures: Vec<(String, StructureMask)>,
}

impl StructureMaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加结构，同名结构被拒绝
    pub fn insert(&mut self, name: impl Into<String>, mask: StructureMask) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(DvhError::DuplicateStructure(name));
        }
        self.structures.push((name, mask));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StructureMask> {
        self.structures
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, mask)| mask)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.structures.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StructureMask)> {
        self.structures
            .iter()
            .map(|(name, mask)| (name.as_str(), mask))
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}
