//! # 多序列聚合
//!
//! 对一组结构（固定剂量）或一组数据集（固定结构）批量计算 DVH 和剂量统计，
//! 生成可直接绘图的长表 (Dose, Structure, Volume) 和汇总表。
//!
//! ## 功能
//! - 按结构聚合：一个剂量，多个结构
//! - 按数据集聚合：一个结构，多个剂量计划或多套分割，序列名为 `结构名_数据集id`
//! - 基于 rayon 的并行计算，输出顺序与输入顺序一致
//! - 单个结构/数据集失败只记录，不中断整个批次
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `dvh/calculator.rs`, `dvh/statistics.rs`
//! - 使用 `rayon` 进行并行计算

use crate::dvh::calculator::DvhCalculator;
use crate::dvh::statistics;
use crate::error::{DvhError, Result};
use crate::models::{
    DatasetId, Datasets, DoseAxis, DoseVolume, DvhCurve, StructureMask, StructureMaskSet,
    SummaryRow, SummaryTable,
};

use rayon::prelude::*;

/// 单个序列的失败记录
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFailure {
    /// 结构名或 `结构名_数据集id`
    pub label: String,
    pub reason: String,
}

/// 一条带标签的 DVH 曲线
#[derive(Debug, Clone)]
pub struct DvhSeries {
    pub label: String,
    pub curve: DvhCurve,
}

/// 长表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct DvhRecord {
    pub dose: f64,
    pub structure: String,
    pub volume: f64,
}

/// 共享剂量轴的多条 DVH 曲线
#[derive(Debug, Clone)]
pub struct DvhTable {
    pub axis: DoseAxis,
    pub series: Vec<DvhSeries>,
    pub failures: Vec<SeriesFailure>,
}

impl DvhTable {
    /// 展开为长表，按序列顺序、剂量升序排列
    pub fn records(&self) -> Vec<DvhRecord> {
        self.series
            .iter()
            .flat_map(|s| {
                s.curve.points.iter().map(move |p| DvhRecord {
                    dose: p.dose,
                    structure: s.label.clone(),
                    volume: p.volume,
                })
            })
            .collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.label.as_str())
    }
}

/// 汇总表及其失败记录
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub table: SummaryTable,
    pub failures: Vec<SeriesFailure>,
}

/// 按数据集聚合时的一个输入：数据集 id、剂量、该数据集中的结构掩膜
pub type DatasetPair<'a> = (DatasetId, &'a DoseVolume, Option<&'a StructureMask>);

/// 按结构聚合 DVH：一个剂量，多个结构
pub fn dvh_by_structure(dose: &DoseVolume, masks: &StructureMaskSet, axis: DoseAxis) -> DvhTable {
    let calculator = DvhCalculator::new(axis);
    let structures: Vec<(&str, &StructureMask)> = masks.iter().collect();

    let results: Vec<(String, Result<DvhCurve>)> = structures
        .par_iter()
        .map(|(name, mask)| (name.to_string(), calculator.compute(dose, mask)))
        .collect();

    collect_series(axis, results)
}

/// 按数据集聚合 DVH：一个结构，多个 (剂量, 掩膜) 组合
pub fn dvh_by_dataset(structure: &str, pairs: &[DatasetPair<'_>], axis: DoseAxis) -> DvhTable {
    let calculator = DvhCalculator::new(axis);

    let results: Vec<(String, Result<DvhCurve>)> = pairs
        .par_iter()
        .map(|(id, dose, mask)| {
            let label = format!("{}_{}", structure, id);
            let curve = match mask {
                Some(mask) => calculator.compute(dose, mask),
                None => Err(DvhError::MissingStructure(structure.to_string())),
            };
            (label, curve)
        })
        .collect();

    collect_series(axis, results)
}

/// 同一结构在多个剂量计划下的组合
pub fn pairs_across_doses<'a>(
    doses: &'a Datasets<DoseVolume>,
    mask: &'a StructureMask,
) -> Vec<DatasetPair<'a>> {
    doses
        .iter()
        .map(|(id, dose)| (id.clone(), dose, Some(mask)))
        .collect()
}

/// 同一结构在多套分割下的组合（共享一个剂量）
pub fn pairs_across_segmentations<'a>(
    dose: &'a DoseVolume,
    segmentations: &'a Datasets<StructureMaskSet>,
    structure: &str,
) -> Vec<DatasetPair<'a>> {
    segmentations
        .iter()
        .map(|(id, masks)| (id.clone(), dose, masks.get(structure)))
        .collect()
}

/// 按结构计算汇总表
pub fn summary_by_structure(dose: &DoseVolume, masks: &StructureMaskSet) -> SummaryOutcome {
    let structures: Vec<(&str, &StructureMask)> = masks.iter().collect();

    let results: Vec<(String, Result<SummaryRow>)> = structures
        .par_iter()
        .map(|(name, mask)| (name.to_string(), statistics::summarize(name, dose, mask)))
        .collect();

    let mut rows = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (label, result) in results {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => failures.push(SeriesFailure {
                label,
                reason: e.to_string(),
            }),
        }
    }

    SummaryOutcome {
        table: SummaryTable::from_rows(rows),
        failures,
    }
}

/// 每个剂量计划一张汇总表（共享一套分割）
pub fn summaries_across_doses(
    doses: &Datasets<DoseVolume>,
    masks: &StructureMaskSet,
) -> Vec<(DatasetId, SummaryOutcome)> {
    let entries: Vec<(&DatasetId, &DoseVolume)> = doses.iter().collect();
    entries
        .par_iter()
        .map(|(id, dose)| ((*id).clone(), summary_by_structure(dose, masks)))
        .collect()
}

/// 每套分割一张汇总表（共享一个剂量）
pub fn summaries_across_segmentations(
    dose: &DoseVolume,
    segmentations: &Datasets<StructureMaskSet>,
) -> Vec<(DatasetId, SummaryOutcome)> {
    let entries: Vec<(&DatasetId, &StructureMaskSet)> = segmentations.iter().collect();
    entries
        .par_iter()
        .map(|(id, masks)| ((*id).clone(), summary_by_structure(dose, masks)))
        .collect()
}

/// 拆分成功曲线与失败记录，保持输入顺序
fn collect_series(axis: DoseAxis, results: Vec<(String, Result<DvhCurve>)>) -> DvhTable {
    let mut series = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for (label, result) in results {
        match result {
            Ok(curve) => series.push(DvhSeries { label, curve }),
            Err(e) => failures.push(SeriesFailure {
                label,
                reason: e.to_string(),
            }),
        }
    }

    DvhTable {
        axis,
        series,
        failures,
    }
}
