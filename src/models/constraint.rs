//! # 临床剂量约束数据模型
//!
//! 约束类型、约束条目、内置默认约束表以及合规判定结果。
//!
//! ## 依赖关系
//! - 被 `dvh/compliance.rs`, `parsers/constraints.rs` 使用
//! - 被 `commands/` 使用

use crate::error::{DvhError, Result};

use std::fmt;
use std::str::FromStr;

/// 约束类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// 最大剂量不得超过限值
    Max,
    /// 最小剂量不得低于限值
    Min,
    /// 平均剂量不得超过限值
    Mean,
    /// 体积约束（当前不计算，只报告为未检查）
    Volume,
}

impl ConstraintKind {
    /// 用于原因描述的首字母大写名称
    pub fn label(&self) -> &'static str {
        match self {
            ConstraintKind::Max => "Max",
            ConstraintKind::Min => "Min",
            ConstraintKind::Mean => "Mean",
            ConstraintKind::Volume => "Volume",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Max => write!(f, "max"),
            ConstraintKind::Min => write!(f, "min"),
            ConstraintKind::Mean => write!(f, "mean"),
            ConstraintKind::Volume => write!(f, "volume"),
        }
    }
}

impl FromStr for ConstraintKind {
    type Err = DvhError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "max" => Ok(ConstraintKind::Max),
            "min" => Ok(ConstraintKind::Min),
            "mean" => Ok(ConstraintKind::Mean),
            "volume" => Ok(ConstraintKind::Volume),
            other => Err(DvhError::InvalidArgument(format!(
                "unknown constraint type '{}' (expected max, min, mean or volume)",
                other
            ))),
        }
    }
}

/// 单条约束：结构名、类型、限值（Gy）
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSpec {
    pub structure: String,
    pub kind: ConstraintKind,
    pub limit: f64,
}

impl ConstraintSpec {
    pub fn new(structure: impl Into<String>, kind: ConstraintKind, limit: f64) -> Self {
        Self {
            structure: structure.into(),
            kind,
            limit,
        }
    }
}

/// 内置默认约束表（15 条）
pub fn default_constraints() -> Vec<ConstraintSpec> {
    use ConstraintKind::*;

    [
        ("Brain", Mean, 30.0),
        ("BrainStem", Max, 54.0),
        ("Chiasm", Max, 54.0),
        ("Cochlea_L", Mean, 45.0),
        ("Cochlea_R", Mean, 45.0),
        ("Eye_L", Max, 10.0),
        ("Eye_R", Max, 10.0),
        ("Hippocampus_L", Mean, 30.0),
        ("Hippocampus_R", Mean, 30.0),
        ("LacrimalGland_L", Mean, 25.0),
        ("LacrimalGland_R", Mean, 25.0),
        ("OpticNerve_L", Max, 54.0),
        ("OpticNerve_R", Max, 54.0),
        ("Pituitary", Mean, 45.0),
        ("Target", Min, 60.0),
    ]
    .into_iter()
    .map(|(structure, kind, limit)| ConstraintSpec::new(structure, kind, limit))
    .collect()
}

/// 合规状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceStatus {
    Pass,
    Fail,
    /// 约束类型没有对应的检查（volume）
    Unchecked,
    /// 结构缺失或为空，无法评估
    NotEvaluable,
}

impl ComplianceStatus {
    /// 是否视为违反约束
    pub fn is_failure(&self) -> bool {
        matches!(self, ComplianceStatus::Fail)
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceStatus::Pass => write!(f, "Pass"),
            ComplianceStatus::Fail => write!(f, "Fail"),
            ComplianceStatus::Unchecked => write!(f, "Unchecked"),
            ComplianceStatus::NotEvaluable => write!(f, "Not evaluable"),
        }
    }
}

/// 单条约束的判定结果
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceVerdict {
    pub structure: String,
    pub kind: ConstraintKind,
    pub limit: f64,
    pub status: ComplianceStatus,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let constraints = default_constraints();
        assert_eq!(constraints.len(), 15);

        let brain = &constraints[0];
        assert_eq!(brain.structure, "Brain");
        assert_eq!(brain.kind, ConstraintKind::Mean);
        assert_eq!(brain.limit, 30.0);

        let target = constraints.iter().find(|c| c.structure == "Target").unwrap();
        assert_eq!(target.kind, ConstraintKind::Min);
        assert_eq!(target.limit, 60.0);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("MAX".parse::<ConstraintKind>().unwrap(), ConstraintKind::Max);
        assert_eq!(" mean ".parse::<ConstraintKind>().unwrap(), ConstraintKind::Mean);
        assert_eq!("volume".parse::<ConstraintKind>().unwrap(), ConstraintKind::Volume);
        assert!("dmax".parse::<ConstraintKind>().is_err());
        assert_eq!(ConstraintKind::Min.to_string(), "min");
    }
}
