//! # 剂量体积分析模块
//!
//! 提供 DVH 计算、剂量统计、跨数据集比较和约束合规检查。
//!
//! ## 子模块
//! - `selector`: 按掩膜选择体素
//! - `calculator`: 累积 DVH 计算
//! - `statistics`: 剂量统计指标
//! - `aggregate`: 多结构 / 多数据集聚合
//! - `compare`: 结构求交与差值
//! - `compliance`: 约束合规检查
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`

pub mod aggregate;
pub mod calculator;
pub mod compare;
pub mod compliance;
pub mod export;
pub mod plot;
pub mod selector;
pub mod statistics;

pub use aggregate::{DvhTable, SeriesFailure, SummaryOutcome};
pub use calculator::DvhCalculator;
pub use compare::{DatasetComparison, DifferenceOutcome};
pub use compliance::ComplianceReport;
