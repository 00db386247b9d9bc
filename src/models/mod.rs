//! # 数据模型模块
//!
//! 定义剂量体积、结构掩膜、DVH 曲线、剂量统计和约束的统一数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `dvh/` 和 `commands/` 使用
//! - 子模块: volume, dvh, summary, constraint

pub mod constraint;
pub mod dvh;
pub mod summary;
pub mod volume;

pub use constraint::{
    default_constraints, ComplianceStatus, ComplianceVerdict, ConstraintKind, ConstraintSpec,
};
pub use dvh::{DoseAxis, DvhCurve, DvhPoint};
pub use summary::{DoseMetrics, SummaryRow, SummaryTable, METRIC_NAMES};
pub use volume::{DatasetId, Datasets, DoseVolume, StructureMask, StructureMaskSet};
