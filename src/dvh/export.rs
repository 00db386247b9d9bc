//! # 数据导出
//!
//! 导出 DVH 长表、剂量汇总表、差值表和合规检查结果到 CSV。
//!
//! ## 支持格式
//! - DVH: Dose, Structure, Volume（长表，可直接多序列绘图）
//! - 汇总表: Structure + 六项指标 + Voxels，空结构的指标留空
//! - 差值表: Dataset, Reference, Structure + 六项差值 + Note
//! - 合规检查: Structure, Constraint Type, Level, Compliance, Reason
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `dvh/aggregate.rs`, `dvh/compare.rs` 的结果结构
//! - 使用 `csv` 库写入 CSV 文件

use crate::dvh::aggregate::DvhTable;
use crate::dvh::compare::{DatasetComparison, DifferenceOutcome};
use crate::error::{DvhError, Result};
use crate::models::{ComplianceVerdict, SummaryTable, METRIC_NAMES};

use std::fs::File;
use std::path::Path;

/// 导出 DVH 长表
pub fn dvh_to_csv(table: &DvhTable, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["Dose", "Structure", "Volume"])?;

    for record in table.records() {
        wtr.write_record([
            format!("{:.4}", record.dose),
            record.structure,
            record.volume.to_string(),
        ])?;
    }

    flush(wtr, output_path)
}

/// 导出剂量汇总表
pub fn summary_to_csv(table: &SummaryTable, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    let mut header = vec!["Structure"];
    header.extend(METRIC_NAMES);
    header.push("Voxels");
    wtr.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![row.structure.clone()];
        match &row.metrics {
            Some(metrics) => record.extend(metrics.values().iter().map(|v| v.to_string())),
            None => record.extend(METRIC_NAMES.iter().map(|_| String::new())),
        }
        record.push(row.voxel_count.to_string());
        wtr.write_record(&record)?;
    }

    flush(wtr, output_path)
}

/// 导出参考数据集比较结果
pub fn differences_to_csv(comparisons: &[DatasetComparison], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    let mut header = vec!["Dataset", "Reference", "Structure"];
    header.extend(METRIC_NAMES);
    header.push("Note");
    wtr.write_record(&header)?;

    for comparison in comparisons {
        for row in &comparison.table.rows {
            let mut record = vec![
                comparison.dataset.to_string(),
                comparison.reference.to_string(),
                row.structure.clone(),
            ];
            match &row.outcome {
                DifferenceOutcome::Delta(delta) => {
                    record.extend(delta.values().iter().map(|v| v.to_string()));
                    record.push(String::new());
                }
                DifferenceOutcome::NotComparable(reason) => {
                    record.extend(METRIC_NAMES.iter().map(|_| String::new()));
                    record.push(reason.clone());
                }
            }
            wtr.write_record(&record)?;
        }
    }

    flush(wtr, output_path)
}

/// 导出合规检查结果
pub fn compliance_to_csv(verdicts: &[ComplianceVerdict], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["Structure", "Constraint Type", "Level", "Compliance", "Reason"])?;

    for verdict in verdicts {
        wtr.write_record([
            verdict.structure.clone(),
            verdict.kind.to_string(),
            verdict.limit.to_string(),
            verdict.status.to_string(),
            verdict.reason.clone(),
        ])?;
    }

    flush(wtr, output_path)
}

fn flush(mut wtr: csv::Writer<File>, output_path: &Path) -> Result<()> {
    wtr.flush().map_err(|e| DvhError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })
}
