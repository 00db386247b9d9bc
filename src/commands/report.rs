//! # 结果输出
//!
//! 终端表格（`tabled`）与 DVH 文件输出（CSV + 图表），供各子命令复用。
//!
//! ## 依赖关系
//! - 被 `commands/` 各子命令使用
//! - 使用 `dvh/export.rs`, `dvh/plot.rs`
//! - 使用 `tabled` 打印表格

use crate::cli::common::{OutputArgs, PlotFormat};
use crate::dvh::compare::{DatasetComparison, DifferenceOutcome};
use crate::dvh::{export, plot, DvhTable, SeriesFailure};
use crate::error::Result;
use crate::models::{ComplianceVerdict, ConstraintSpec, DoseMetrics, SummaryTable};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 汇总表中的一行（终端显示）
#[derive(Debug, Clone, Tabled)]
pub struct SummaryDisplayRow {
    #[tabled(rename = "Structure")]
    pub structure: String,
    #[tabled(rename = "Mean Dose")]
    pub mean: String,
    #[tabled(rename = "Max Dose")]
    pub max: String,
    #[tabled(rename = "Min Dose")]
    pub min: String,
    #[tabled(rename = "D95")]
    pub d95: String,
    #[tabled(rename = "D50")]
    pub d50: String,
    #[tabled(rename = "D5")]
    pub d5: String,
    #[tabled(rename = "Voxels")]
    pub voxels: usize,
}

/// 差值表中的一行（终端显示）
#[derive(Debug, Clone, Tabled)]
pub struct DifferenceDisplayRow {
    #[tabled(rename = "Dataset")]
    pub dataset: String,
    #[tabled(rename = "Structure")]
    pub structure: String,
    #[tabled(rename = "ΔMean")]
    pub mean: String,
    #[tabled(rename = "ΔMax")]
    pub max: String,
    #[tabled(rename = "ΔMin")]
    pub min: String,
    #[tabled(rename = "ΔD95")]
    pub d95: String,
    #[tabled(rename = "ΔD50")]
    pub d50: String,
    #[tabled(rename = "ΔD5")]
    pub d5: String,
}

/// 合规检查中的一行（终端显示）
#[derive(Debug, Clone, Tabled)]
pub struct ComplianceDisplayRow {
    #[tabled(rename = "Structure")]
    pub structure: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Level (Gy)")]
    pub limit: String,
    #[tabled(rename = "Compliance")]
    pub status: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

/// 约束表中的一行（终端显示）
#[derive(Debug, Clone, Tabled)]
pub struct ConstraintDisplayRow {
    #[tabled(rename = "Structure")]
    pub structure: String,
    #[tabled(rename = "Constraint Type")]
    pub kind: String,
    #[tabled(rename = "Level (Gy)")]
    pub limit: String,
}

const NOT_AVAILABLE: &str = "N/A";

fn metric_cells(metrics: Option<&DoseMetrics>) -> [String; 6] {
    match metrics {
        Some(m) => m.values().map(|v| format!("{:.2}", v)),
        None => std::array::from_fn(|_| NOT_AVAILABLE.to_string()),
    }
}

pub fn summary_rows(table: &SummaryTable) -> Vec<SummaryDisplayRow> {
    table
        .rows()
        .iter()
        .map(|row| {
            let [mean, max, min, d95, d50, d5] = metric_cells(row.metrics.as_ref());
            SummaryDisplayRow {
                structure: row.structure.clone(),
                mean,
                max,
                min,
                d95,
                d50,
                d5,
                voxels: row.voxel_count,
            }
        })
        .collect()
}

pub fn difference_rows(comparisons: &[DatasetComparison]) -> Vec<DifferenceDisplayRow> {
    comparisons
        .iter()
        .flat_map(|comparison| {
            let dataset = format!("{} - {}", comparison.dataset, comparison.reference);
            comparison.table.rows.iter().map(move |row| {
                let [mean, max, min, d95, d50, d5] = match &row.outcome {
                    DifferenceOutcome::Delta(delta) => metric_cells(Some(delta)),
                    DifferenceOutcome::NotComparable(_) => metric_cells(None),
                };
                DifferenceDisplayRow {
                    dataset: dataset.clone(),
                    structure: row.structure.clone(),
                    mean,
                    max,
                    min,
                    d95,
                    d50,
                    d5,
                }
            })
        })
        .collect()
}

pub fn compliance_rows(verdicts: &[ComplianceVerdict]) -> Vec<ComplianceDisplayRow> {
    verdicts
        .iter()
        .map(|v| ComplianceDisplayRow {
            structure: v.structure.clone(),
            kind: v.kind.to_string(),
            limit: format!("{:.2}", v.limit),
            status: v.status.to_string(),
            reason: v.reason.clone(),
        })
        .collect()
}

pub fn constraint_rows(constraints: &[ConstraintSpec]) -> Vec<ConstraintDisplayRow> {
    constraints
        .iter()
        .map(|c| ConstraintDisplayRow {
            structure: c.structure.clone(),
            kind: c.kind.to_string(),
            limit: format!("{:.2}", c.limit),
        })
        .collect()
}

/// 打印任意表格
pub fn print_table<T: Tabled>(title: &str, rows: &[T]) {
    if rows.is_empty() {
        output::print_warning(&format!("{}: nothing to show", title));
        return;
    }
    output::print_header(title);
    println!("{}", Table::new(rows));
}

/// 打印不可比较结构的原因
pub fn print_not_comparable(comparisons: &[DatasetComparison]) {
    let notes: Vec<(String, String)> = comparisons
        .iter()
        .flat_map(|c| {
            c.table.rows.iter().filter_map(move |row| match &row.outcome {
                DifferenceOutcome::NotComparable(reason) => Some((
                    format!("{} vs {}", c.dataset, c.reference),
                    reason.clone(),
                )),
                DifferenceOutcome::Delta(_) => None,
            })
        })
        .collect();
    output::print_failures("Not comparable:", &notes);
}

/// 打印聚合失败记录
pub fn print_series_failures(title: &str, failures: &[SeriesFailure]) {
    let failures: Vec<(String, String)> = failures
        .iter()
        .map(|f| (f.label.clone(), f.reason.clone()))
        .collect();
    output::print_failures(title, &failures);
}

/// 写出 DVH 长表 CSV 和图表：`<stem>.csv`，`<stem>.<png|svg>`
pub fn write_dvh(table: &DvhTable, out: &OutputArgs, stem: &str, title: &str) -> Result<()> {
    print_series_failures(
        &format!("DVH '{}' skipped {} series:", title, table.failures.len()),
        &table.failures,
    );

    if table.series.is_empty() {
        output::print_warning(&format!("No DVH series computed for '{}'", title));
        return Ok(());
    }

    let csv_path = out.output_dir.join(format!("{}.csv", stem));
    export::dvh_to_csv(table, &csv_path)?;
    output::print_saved("DVH table", &csv_path);

    if !out.no_plot {
        let plot_path = out
            .output_dir
            .join(format!("{}.{}", stem, out.format.extension()));
        plot::generate_dvh_plot(
            table,
            &plot_path,
            title,
            out.width,
            out.height,
            out.format == PlotFormat::Svg,
        )?;
        output::print_saved("DVH chart", &plot_path);
    }

    Ok(())
}

/// 结构名中的路径分隔符等字符替换为下划线，用作文件名
pub fn file_stem_for(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dvh::compare::{DifferenceRow, DifferenceTable};
    use crate::models::{ComplianceStatus, ConstraintKind, DatasetId, SummaryRow};

    fn metrics() -> DoseMetrics {
        DoseMetrics {
            mean: 30.456,
            max: 56.0,
            min: 1.0,
            d95: 2.0,
            d50: 29.0,
            d5: 52.0,
        }
    }

    #[test]
    fn test_summary_rows_show_na_for_empty_structures() {
        let table = SummaryTable::from_rows(vec![
            SummaryRow {
                structure: "Brain".to_string(),
                voxel_count: 8,
                metrics: Some(metrics()),
            },
            SummaryRow {
                structure: "Eye_L".to_string(),
                voxel_count: 0,
                metrics: None,
            },
        ]);

        let rows = summary_rows(&table);
        assert_eq!(rows[0].mean, "30.46");
        assert_eq!(rows[0].voxels, 8);
        assert_eq!(rows[1].d95, "N/A");
    }

    #[test]
    fn test_difference_rows() {
        let comparisons = vec![DatasetComparison {
            dataset: DatasetId::from(3),
            reference: DatasetId::from(1),
            table: DifferenceTable {
                rows: vec![
                    DifferenceRow {
                        structure: "Brain".to_string(),
                        outcome: DifferenceOutcome::Delta(metrics()),
                    },
                    DifferenceRow {
                        structure: "Eye".to_string(),
                        outcome: DifferenceOutcome::NotComparable("missing".to_string()),
                    },
                ],
            },
        }];

        let rows = difference_rows(&comparisons);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].dataset, "3 - 1");
        assert_eq!(rows[0].max, "56.00");
        assert_eq!(rows[1].mean, "N/A");
    }

    #[test]
    fn test_compliance_and_constraint_rows() {
        let verdicts = vec![ComplianceVerdict {
            structure: "Chiasm".to_string(),
            kind: ConstraintKind::Max,
            limit: 54.0,
            status: ComplianceStatus::Fail,
            reason: "Max dose constraint 54.00 Gy exceeded: 56.00 Gy".to_string(),
        }];
        let rows = compliance_rows(&verdicts);
        assert_eq!(rows[0].kind, "max");
        assert_eq!(rows[0].limit, "54.00");
        assert_eq!(rows[0].status, "Fail");

        let rows = constraint_rows(&[ConstraintSpec::new("Brain", ConstraintKind::Mean, 30.0)]);
        assert_eq!(rows[0].kind, "mean");
        assert_eq!(rows[0].limit, "30.00");
    }

    #[test]
    fn test_file_stem_for() {
        assert_eq!(file_stem_for("Eye_L"), "Eye_L");
        assert_eq!(file_stem_for("PTV 60/boost"), "PTV_60_boost");
    }
}
