//! # DVH 计算器
//!
//! 实现累积剂量体积直方图的核心算法。
//!
//! ## 算法概述
//! 1. 按掩膜选出结构内体素剂量
//! 2. 排序剂量值
//! 3. 对每个剂量 bin `b`，二分查找剂量 >= b 的体素数
//! 4. 体积百分比 = 100 * count / 总体素数
//!
//! 曲线是"至少接受剂量 b 的体积"，不是概率密度。空结构得到全零曲线。
//!
//! ## 依赖关系
//! - 被 `dvh/aggregate.rs` 调用
//! - 使用 `dvh/selector.rs` 选择体素
//! - 使用 `models/dvh.rs` 的 DoseAxis, DvhCurve 结构

use crate::dvh::selector;
use crate::error::Result;
use crate::models::{DoseAxis, DoseVolume, DvhCurve, DvhPoint, StructureMask};

/// DVH 计算器
#[derive(Debug, Clone, Copy)]
pub struct DvhCalculator {
    /// 所有曲线共享的剂量轴
    axis: DoseAxis,
}

/// 单结构计算的默认剂量轴为 0-65 Gy
impl Default for DvhCalculator {
    fn default() -> Self {
        Self::new(DoseAxis::PRIMITIVE)
    }
}

impl DvhCalculator {
    /// 创建新的 DVH 计算器
    pub fn new(axis: DoseAxis) -> Self {
        Self { axis }
    }

    /// 计算单个结构的 DVH 曲线
    pub fn compute(&self, dose: &DoseVolume, mask: &StructureMask) -> Result<DvhCurve> {
        let doses = selector::select_voxels(dose, mask)?;
        Ok(self.curve_from_doses(doses))
    }

    /// 由已选出的体素剂量构建曲线
    pub fn curve_from_doses(&self, mut doses: Vec<f64>) -> DvhCurve {
        let bins = self.axis.bins();
        let total = doses.len();

        if total == 0 {
            return DvhCurve {
                points: bins
                    .into_iter()
                    .map(|dose| DvhPoint { dose, volume: 0.0 })
                    .collect(),
            };
        }

        // NaN 计入总体素数，但不满足任何 >= 比较
        doses.retain(|d| !d.is_nan());
        doses.sort_by(f64::total_cmp);

        let points = bins
            .into_iter()
            .map(|bin| {
                let received = doses.len() - doses.partition_point(|&d| d < bin);
                DvhPoint {
                    dose: bin,
                    volume: 100.0 * received as f64 / total as f64,
                }
            })
            .collect();

        DvhCurve { points }
    }
}
