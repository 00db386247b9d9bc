//! # 约束合规检查
//!
//! 将汇总表与临床剂量约束表逐条比较。
//!
//! ## 判定规则
//! - `max`: MaxDose > 限值 则不合规
//! - `min`: MinDose < 限值 则不合规
//! - `mean`: MeanDose > 限值 则不合规
//! - `volume`: 不做任何计算，报告为 Unchecked
//! - 结构不在汇总表中或结构为空：Not evaluable
//!
//! ## 依赖关系
//! - 被 `commands/single.rs` 调用
//! - 使用 `models/constraint.rs`, `models/summary.rs`

use crate::models::{
    ComplianceStatus, ComplianceVerdict, ConstraintKind, ConstraintSpec, DoseMetrics,
    SummaryTable,
};

/// 合规检查统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComplianceReport {
    pub passed: usize,
    pub failed: usize,
    pub unchecked: usize,
    pub not_evaluable: usize,
}

impl ComplianceReport {
    pub fn from_verdicts(verdicts: &[ComplianceVerdict]) -> Self {
        let mut report = Self::default();
        for verdict in verdicts {
            match verdict.status {
                ComplianceStatus::Pass => report.passed += 1,
                ComplianceStatus::Fail => report.failed += 1,
                ComplianceStatus::Unchecked => report.unchecked += 1,
                ComplianceStatus::NotEvaluable => report.not_evaluable += 1,
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.unchecked + self.not_evaluable
    }
}

/// 逐条约束评估，输出顺序与约束顺序一致
pub fn evaluate(summary: &SummaryTable, constraints: &[ConstraintSpec]) -> Vec<ComplianceVerdict> {
    constraints
        .iter()
        .map(|constraint| evaluate_one(summary, constraint))
        .collect()
}

fn evaluate_one(summary: &SummaryTable, constraint: &ConstraintSpec) -> ComplianceVerdict {
    let (status, reason) = judge(summary, constraint);
    ComplianceVerdict {
        structure: constraint.structure.clone(),
        kind: constraint.kind,
        limit: constraint.limit,
        status,
        reason,
    }
}

fn judge(summary: &SummaryTable, constraint: &ConstraintSpec) -> (ComplianceStatus, String) {
    let kind = constraint.kind;
    let limit = constraint.limit;

    let row = match summary.get(&constraint.structure) {
        Some(row) => row,
        None => {
            return (
                ComplianceStatus::NotEvaluable,
                format!(
                    "{} dose constraint {:.2} Gy not evaluable: structure not found",
                    kind.label(),
                    limit
                ),
            )
        }
    };

    let (verb, pick): (&str, fn(&DoseMetrics) -> f64) = match kind {
        ConstraintKind::Max => ("exceeded", |m: &DoseMetrics| m.max),
        ConstraintKind::Min => ("not met", |m: &DoseMetrics| m.min),
        ConstraintKind::Mean => ("exceeded", |m: &DoseMetrics| m.mean),
        ConstraintKind::Volume => {
            return (
                ComplianceStatus::Unchecked,
                format!(
                    "Volume constraint {:.2} Gy not checked: no volume metric is computed",
                    limit
                ),
            )
        }
    };

    let observed = match &row.metrics {
        Some(metrics) => pick(metrics),
        None => {
            return (
                ComplianceStatus::NotEvaluable,
                format!(
                    "{} dose constraint {:.2} Gy not evaluable: structure has no voxels",
                    kind.label(),
                    limit
                ),
            )
        }
    };

    if observed.is_nan() {
        return (
            ComplianceStatus::NotEvaluable,
            format!(
                "{} dose constraint {:.2} Gy not evaluable: dose contains NaN",
                kind.label(),
                limit
            ),
        );
    }

    let violated = match kind {
        ConstraintKind::Min => observed < limit,
        _ => observed > limit,
    };

    if violated {
        (
            ComplianceStatus::Fail,
            format!(
                "{} dose constraint {:.2} Gy {}: {:.2} Gy",
                kind.label(),
                limit,
                verb,
                observed
            ),
        )
    } else {
        (
            ComplianceStatus::Pass,
            format!(
                "{} dose {:.2} Gy is within constraint {:.2} Gy",
                kind.label(),
                observed,
                limit
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_constraints, SummaryRow};

    fn row(structure: &str, mean: f64, max: f64, min: f64) -> SummaryRow {
        SummaryRow {
            structure: structure.to_string(),
            voxel_count: 100,
            metrics: Some(DoseMetrics {
                mean,
                max,
                min,
                d95: min,
                d50: mean,
                d5: max,
            }),
        }
    }

    fn single(structure: &str, kind: ConstraintKind, limit: f64, r: SummaryRow) -> ComplianceVerdict {
        let table = SummaryTable::from_rows(vec![r]);
        let verdicts = evaluate(&table, &[ConstraintSpec::new(structure, kind, limit)]);
        assert_eq!(verdicts.len(), 1);
        verdicts.into_iter().next().unwrap()
    }

    #[test]
    fn test_max_constraint() {
        let fail = single("BrainStem", ConstraintKind::Max, 54.0, row("BrainStem", 30.0, 56.0, 2.0));
        assert_eq!(fail.status, ComplianceStatus::Fail);
        assert!(fail.reason.contains("54"));
        assert!(fail.reason.contains("56"));
        assert!(fail.reason.contains("Max"));

        let pass = single("BrainStem", ConstraintKind::Max, 54.0, row("BrainStem", 30.0, 50.0, 2.0));
        assert_eq!(pass.status, ComplianceStatus::Pass);
        assert!(pass.reason.contains("50"));
    }

    #[test]
    fn test_max_at_limit_passes() {
        let verdict = single("Chiasm", ConstraintKind::Max, 54.0, row("Chiasm", 20.0, 54.0, 1.0));
        assert_eq!(verdict.status, ComplianceStatus::Pass);
    }

    #[test]
    fn test_mean_constraint() {
        let pass = single("Brain", ConstraintKind::Mean, 30.0, row("Brain", 28.0, 60.0, 0.0));
        assert_eq!(pass.status, ComplianceStatus::Pass);

        let fail = single("Brain", ConstraintKind::Mean, 30.0, row("Brain", 31.0, 60.0, 0.0));
        assert_eq!(fail.status, ComplianceStatus::Fail);
        assert!(fail.reason.contains("30"));
        assert!(fail.reason.contains("31"));
    }

    #[test]
    fn test_min_constraint() {
        let fail = single("Target", ConstraintKind::Min, 60.0, row("Target", 62.0, 66.0, 57.5));
        assert_eq!(fail.status, ComplianceStatus::Fail);
        assert!(fail.reason.contains("57.50"));

        let pass = single("Target", ConstraintKind::Min, 60.0, row("Target", 62.0, 66.0, 60.0));
        assert_eq!(pass.status, ComplianceStatus::Pass);
    }

    #[test]
    fn test_nan_dose_is_not_evaluable() {
        let verdict = single("Brain", ConstraintKind::Max, 60.0, row("Brain", f64::NAN, f64::NAN, f64::NAN));
        assert_eq!(verdict.status, ComplianceStatus::NotEvaluable);
        assert!(verdict.reason.contains("NaN"));
    }

    #[test]
    fn test_volume_constraint_is_unchecked() {
        let verdict = single("Brain", ConstraintKind::Volume, 20.0, row("Brain", 99.0, 99.0, 99.0));
        assert_eq!(verdict.status, ComplianceStatus::Unchecked);
        assert!(!verdict.status.is_failure());
        assert!(verdict.reason.contains("20"));
    }

    #[test]
    fn test_missing_and_empty_structures() {
        let empty = SummaryRow {
            structure: "Eye_L".to_string(),
            voxel_count: 0,
            metrics: None,
        };
        let table = SummaryTable::from_rows(vec![row("Brain", 20.0, 40.0, 1.0), empty]);

        let verdicts = evaluate(&table, &default_constraints());
        assert_eq!(verdicts.len(), 15);
        assert_eq!(verdicts[0].structure, "Brain");
        assert_eq!(verdicts[0].status, ComplianceStatus::Pass);

        let eye = verdicts.iter().find(|v| v.structure == "Eye_L").unwrap();
        assert_eq!(eye.status, ComplianceStatus::NotEvaluable);

        let chiasm = verdicts.iter().find(|v| v.structure == "Chiasm").unwrap();
        assert_eq!(chiasm.status, ComplianceStatus::NotEvaluable);
        assert!(chiasm.reason.contains("54"));

        let report = ComplianceReport::from_verdicts(&verdicts);
        assert_eq!(report.passed, 1);
        assert_eq!(report.not_evaluable, 14);
        assert_eq!(report.total(), 15);
    }
}
