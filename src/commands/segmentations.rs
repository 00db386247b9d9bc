//! # segmentations 命令实现
//!
//! 同一剂量下比较多套分割（例如不同勾画者或自动分割模型）。
//!
//! ## 功能
//! - 每套分割的剂量汇总表
//! - 公共结构求交，没有公共结构时报错
//! - 所选结构相对参考分割的逐指标差值
//! - 每个结构一张跨分割 DVH 图（序列名 `结构名_分割id`）
//!
//! ## 依赖关系
//! - 使用 `cli/compare.rs` 定义的 SegmentationsArgs
//! - 使用 `commands/inputs.rs`, `commands/report.rs`
//! - 使用 `dvh/` 计算

use crate::cli::compare::SegmentationsArgs;
use crate::commands::{inputs, report};
use crate::dvh::{aggregate, compare, export};
use crate::error::Result;
use crate::models::{DatasetId, Datasets, StructureMaskSet, SummaryTable};
use crate::utils::output;

/// 执行 segmentations 命令
pub fn execute(args: SegmentationsArgs) -> Result<()> {
    output::print_header("Segmentation Comparison");

    inputs::check_dataset_count(args.masks.len(), "segmentations")?;
    let reference = inputs::reference_id(args.reference, args.masks.len())?;
    let axis = args.axis.axis()?;

    let out_dir = &args.output.output_dir;
    inputs::prepare_output_dir(out_dir)?;

    let dose = inputs::load_dose(&args.dose)?;

    let mut segmentations: Datasets<StructureMaskSet> = Datasets::new();
    for (index, dir) in args.masks.iter().enumerate() {
        let id = DatasetId::from(index + 1);
        output::print_info(&format!("Segmentation {}: '{}'", id, dir.display()));
        segmentations.insert(id, inputs::load_segmentation(dir, &args.load)?)?;
    }

    let common = compare::structure_intersection(segmentations.iter().map(|(_, masks)| masks))?;
    output::print_info(&format!(
        "{} common structures: {}",
        common.len(),
        common.iter().cloned().collect::<Vec<_>>().join(", ")
    ));

    let structures = inputs::select_structures(&args.structures, common.iter().map(String::as_str))?;

    // 每套分割的汇总表
    let summaries = aggregate::summaries_across_segmentations(&dose, &segmentations);
    for (id, outcome) in &summaries {
        report::print_series_failures(
            &format!("Segmentation {} summary skipped:", id),
            &outcome.failures,
        );
        report::print_table(
            &format!("Segmentation {} Summary (Gy)", id),
            &report::summary_rows(&outcome.table),
        );

        let path = out_dir.join(format!("summary_segmentation_{}.csv", id));
        export::summary_to_csv(&outcome.table, &path)?;
        output::print_saved("Summary table", &path);
    }

    // 相对参考分割的差值
    let tables: Vec<(&DatasetId, &SummaryTable)> =
        summaries.iter().map(|(id, outcome)| (id, &outcome.table)).collect();
    let comparisons = compare::compare_to_reference(&tables, &reference, &structures)?;

    report::print_table(
        &format!("Differences vs Segmentation {} (Gy)", reference),
        &report::difference_rows(&comparisons),
    );
    report::print_not_comparable(&comparisons);

    let diff_path = out_dir.join("differences.csv");
    export::differences_to_csv(&comparisons, &diff_path)?;
    output::print_saved("Difference table", &diff_path);

    // 每个结构的跨分割 DVH
    for structure in &structures {
        let pairs = aggregate::pairs_across_segmentations(&dose, &segmentations, structure);
        let table = aggregate::dvh_by_dataset(structure, &pairs, axis);
        report::write_dvh(
            &table,
            &args.output,
            &format!("dvh_{}", report::file_stem_for(structure)),
            &format!("{} across segmentations", structure),
        )?;
    }

    output::print_done(&format!("Results written to '{}'", out_dir.display()));
    Ok(())
}
