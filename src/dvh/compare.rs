//! # 跨数据集比较
//!
//! 多套分割的公共结构求交，以及汇总表之间的逐指标差值。
//!
//! ## 功能
//! - 结构名求交：第一套分割作为种子，依次与后续分割求交
//! - 汇总表差值：`a[结构] - b[结构]`，缺失或空结构记为不可比较
//! - 参考数据集比较：所有非参考数据集只与参考数据集相减，互相之间不比较
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/summary.rs` 的 SummaryTable 结构

use crate::error::{DvhError, Result};
use crate::models::{DatasetId, DoseMetrics, StructureMaskSet, SummaryTable};

use std::collections::BTreeSet;

/// 单个结构的比较结果
#[derive(Debug, Clone, PartialEq)]
pub enum DifferenceOutcome {
    /// 逐指标差值
    Delta(DoseMetrics),
    /// 无法比较的原因
    NotComparable(String),
}

/// 差值表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceRow {
    pub structure: String,
    pub outcome: DifferenceOutcome,
}

/// 差值表，行顺序与请求的结构顺序一致
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DifferenceTable {
    pub rows: Vec<DifferenceRow>,
}

impl DifferenceTable {
    pub fn get(&self, structure: &str) -> Option<&DifferenceOutcome> {
        self.rows
            .iter()
            .find(|row| row.structure == structure)
            .map(|row| &row.outcome)
    }
}

/// 某个数据集相对参考数据集的差值
#[derive(Debug, Clone)]
pub struct DatasetComparison {
    pub dataset: DatasetId,
    pub reference: DatasetId,
    pub table: DifferenceTable,
}

/// 多套分割共有的结构名
///
/// 交集为空（或没有任何分割）时返回 `NoCommonStructures`。
pub fn structure_intersection<'a, I>(mask_sets: I) -> Result<BTreeSet<String>>
where
    I: IntoIterator<Item = &'a StructureMaskSet>,
{
    let mut common: Option<BTreeSet<String>> = None;

    for set in mask_sets {
        let names: BTreeSet<String> = set.names().map(str::to_string).collect();
        common = Some(match common {
            None => names,
            Some(current) => current.intersection(&names).cloned().collect(),
        });
    }

    match common {
        Some(names) if !names.is_empty() => Ok(names),
        _ => Err(DvhError::NoCommonStructures),
    }
}

/// 逐结构计算 `a - b`
pub fn difference<S: AsRef<str>>(
    a: &SummaryTable,
    b: &SummaryTable,
    structures: &[S],
) -> DifferenceTable {
    let rows = structures
        .iter()
        .map(|structure| {
            let structure = structure.as_ref();
            DifferenceRow {
                structure: structure.to_string(),
                outcome: structure_delta(a, b, structure),
            }
        })
        .collect();

    DifferenceTable { rows }
}

/// 所有非参考数据集与参考数据集相减（数据集 - 参考）
pub fn compare_to_reference<S: AsRef<str>>(
    tables: &[(&DatasetId, &SummaryTable)],
    reference: &DatasetId,
    structures: &[S],
) -> Result<Vec<DatasetComparison>> {
    let reference_table = tables
        .iter()
        .find(|(id, _)| *id == reference)
        .map(|(_, table)| *table)
        .ok_or_else(|| DvhError::UnknownDataset(reference.to_string()))?;

    Ok(tables
        .iter()
        .filter(|(id, _)| *id != reference)
        .map(|(id, table)| DatasetComparison {
            dataset: (*id).clone(),
            reference: reference.clone(),
            table: difference(table, reference_table, structures),
        })
        .collect())
}

fn structure_delta(a: &SummaryTable, b: &SummaryTable, structure: &str) -> DifferenceOutcome {
    let (row_a, row_b) = match (a.get(structure), b.get(structure)) {
        (Some(row_a), Some(row_b)) => (row_a, row_b),
        (None, _) => {
            return DifferenceOutcome::NotComparable(format!(
                "structure '{}' missing from compared table",
                structure
            ))
        }
        (_, None) => {
            return DifferenceOutcome::NotComparable(format!(
                "structure '{}' missing from reference table",
                structure
            ))
        }
    };

    match (&row_a.metrics, &row_b.metrics) {
        (Some(ma), Some(mb)) => DifferenceOutcome::Delta(ma.delta(mb)),
        _ => DifferenceOutcome::NotComparable(format!(
            "structure '{}' has no voxels in at least one dataset",
            structure
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StructureMask, SummaryRow};
    use ndarray::Array3;

    fn mask_set(names: &[&str]) -> StructureMaskSet {
        let mut set = StructureMaskSet::new();
        for name in names {
            set.insert(*name, StructureMask::new(Array3::from_elem((1, 1, 1), true)))
                .unwrap();
        }
        set
    }

    fn row(structure: &str, base: f64) -> SummaryRow {
        SummaryRow {
            structure: structure.to_string(),
            voxel_count: 4,
            metrics: Some(DoseMetrics {
                mean: base,
                max: base * 2.0,
                min: base / 2.0,
                d95: base * 0.6,
                d50: base,
                d5: base * 1.8,
            }),
        }
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_intersection_single_set() {
        let s = mask_set(&["Brain", "Eye_L", "Chiasm"]);
        let common = structure_intersection([&s]).unwrap();
        assert_eq!(names(&common), vec!["Brain", "Chiasm", "Eye_L"]);
    }

    #[test]
    fn test_intersection_is_commutative_subset() {
        let s1 = mask_set(&["Brain", "Eye_L", "Chiasm"]);
        let s2 = mask_set(&["Chiasm", "Brain", "Pituitary"]);

        let ab = structure_intersection([&s1, &s2]).unwrap();
        let ba = structure_intersection([&s2, &s1]).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(names(&ab), vec!["Brain", "Chiasm"]);
        assert!(ab.iter().all(|n| s1.get(n).is_some() && s2.get(n).is_some()));
    }

    #[test]
    fn test_intersection_three_sets() {
        let s1 = mask_set(&["Brain", "Eye"]);
        let s2 = mask_set(&["Brain"]);
        let s3 = mask_set(&["Brain", "Eye"]);
        let common = structure_intersection([&s1, &s2, &s3]).unwrap();
        assert_eq!(names(&common), vec!["Brain"]);
    }

    #[test]
    fn test_no_common_structures() {
        let s1 = mask_set(&["Brain"]);
        let s2 = mask_set(&["Eye_L"]);
        assert!(matches!(
            structure_intersection([&s1, &s2]),
            Err(DvhError::NoCommonStructures)
        ));
        assert!(matches!(
            structure_intersection(std::iter::empty::<&StructureMaskSet>()),
            Err(DvhError::NoCommonStructures)
        ));
    }

    #[test]
    fn test_difference_is_antisymmetric() {
        let a = SummaryTable::from_rows(vec![row("Brain", 30.0), row("Chiasm", 12.0)]);
        let b = SummaryTable::from_rows(vec![row("Brain", 26.0), row("Chiasm", 15.0)]);
        let structures = ["Brain", "Chiasm"];

        let ab = difference(&a, &b, &structures);
        let ba = difference(&b, &a, &structures);

        for structure in structures {
            match (ab.get(structure), ba.get(structure)) {
                (Some(DifferenceOutcome::Delta(x)), Some(DifferenceOutcome::Delta(y))) => {
                    for (p, q) in x.values().iter().zip(y.values().iter()) {
                        assert_eq!(*p, -*q);
                    }
                }
                other => panic!("expected deltas, got {:?}", other),
            }
        }

        match ab.get("Brain") {
            Some(DifferenceOutcome::Delta(d)) => assert_eq!(d.mean, 4.0),
            other => panic!("expected delta, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_structure_is_not_comparable() {
        // 两套分割共有 Brain，只有第二套有 Eye
        let s1 = mask_set(&["Brain"]);
        let s2 = mask_set(&["Brain", "Eye"]);
        let common = structure_intersection([&s1, &s2]).unwrap();
        assert_eq!(names(&common), vec!["Brain"]);

        let a = SummaryTable::from_rows(vec![row("Brain", 30.0)]);
        let b = SummaryTable::from_rows(vec![row("Brain", 28.0), row("Eye", 4.0)]);

        let table = difference(&b, &a, &["Eye", "Brain"]);
        assert!(matches!(
            table.get("Eye"),
            Some(DifferenceOutcome::NotComparable(_))
        ));
        assert!(matches!(table.get("Brain"), Some(DifferenceOutcome::Delta(_))));
        assert_eq!(table.rows[0].structure, "Eye");
    }

    #[test]
    fn test_empty_structure_is_not_comparable() {
        let mut empty = row("Eye_L", 0.0);
        empty.voxel_count = 0;
        empty.metrics = None;

        let a = SummaryTable::from_rows(vec![empty]);
        let b = SummaryTable::from_rows(vec![row("Eye_L", 3.0)]);
        assert!(matches!(
            difference(&a, &b, &["Eye_L"]).get("Eye_L"),
            Some(DifferenceOutcome::NotComparable(_))
        ));
    }

    #[test]
    fn test_compare_to_reference() {
        let t1 = SummaryTable::from_rows(vec![row("Brain", 30.0)]);
        let t2 = SummaryTable::from_rows(vec![row("Brain", 33.0)]);
        let t3 = SummaryTable::from_rows(vec![row("Brain", 27.0)]);
        let (id1, id2, id3) = (DatasetId::from(1), DatasetId::from(2), DatasetId::from(3));
        let tables = [(&id1, &t1), (&id2, &t2), (&id3, &t3)];

        let comparisons = compare_to_reference(&tables, &id2, &["Brain"]).unwrap();
        assert_eq!(comparisons.len(), 2);
        assert_eq!(comparisons[0].dataset, id1);
        assert_eq!(comparisons[1].dataset, id3);
        assert!(comparisons.iter().all(|c| c.reference == id2));

        match comparisons[1].table.get("Brain") {
            Some(DifferenceOutcome::Delta(d)) => assert_eq!(d.mean, -6.0),
            other => panic!("expected delta, got {:?}", other),
        }

        let unknown = DatasetId::from(9);
        assert!(matches!(
            compare_to_reference(&tables, &unknown, &["Brain"]),
            Err(DvhError::UnknownDataset(_))
        ));
    }
}
