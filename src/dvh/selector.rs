//! # 体素选择
//!
//! 按掩膜提取结构内的剂量值。
//!
//! ## 依赖关系
//! - 被 `dvh/calculator.rs`, `dvh/statistics.rs` 调用
//! - 使用 `models/volume.rs`

use crate::error::{DvhError, Result};
use crate::models::{DoseVolume, StructureMask};

/// 检查剂量与掩膜是否在同一网格上
pub fn check_shape(dose: &DoseVolume, mask: &StructureMask) -> Result<()> {
    if dose.dim() != mask.dim() {
        return Err(DvhError::ShapeMismatch {
            dose: dose.dim(),
            mask: mask.dim(),
        });
    }
    Ok(())
}

/// 返回掩膜内体素的剂量值（逻辑遍历顺序）
///
/// 空结构返回空向量，不视为错误。
pub fn select_voxels(dose: &DoseVolume, mask: &StructureMask) -> Result<Vec<f64>> {
    check_shape(dose, mask)?;

    Ok(dose
        .data()
        .iter()
        .zip(mask.data().iter())
        .filter(|(_, inside)| **inside)
        .map(|(&d, _)| d)
        .collect())
}
