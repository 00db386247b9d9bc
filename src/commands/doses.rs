//! # doses 命令实现
//!
//! 同一分割下比较多个剂量计划。
//!
//! ## 功能
//! - 每个剂量计划的 DVH 图和汇总表
//! - 所选结构相对参考计划的逐指标差值
//! - 每个结构一张跨计划 DVH 图（序列名 `结构名_计划id`）
//!
//! ## 依赖关系
//! - 使用 `cli/compare.rs` 定义的 DosesArgs
//! - 使用 `commands/inputs.rs`, `commands/report.rs`
//! - 使用 `dvh/` 计算

use crate::cli::compare::DosesArgs;
use crate::commands::{inputs, report};
use crate::dvh::{aggregate, compare, export};
use crate::error::Result;
use crate::models::{DatasetId, Datasets, DoseVolume, SummaryTable};
use crate::utils::output;

/// 执行 doses 命令
pub fn execute(args: DosesArgs) -> Result<()> {
    output::print_header("Dose Plan Comparison");

    inputs::check_dataset_count(args.doses.len(), "dose plans")?;
    let reference = inputs::reference_id(args.reference, args.doses.len())?;
    let axis = args.axis.axis()?;

    let out_dir = &args.output.output_dir;
    inputs::prepare_output_dir(out_dir)?;

    let mut doses: Datasets<DoseVolume> = Datasets::new();
    for (index, path) in args.doses.iter().enumerate() {
        doses.insert(DatasetId::from(index + 1), inputs::load_dose(path)?)?;
    }

    let masks = inputs::load_segmentation(&args.masks, &args.load)?;
    let structures = inputs::select_structures(&args.structures, masks.names())?;

    // 每个计划的 DVH 和汇总表
    for (id, dose) in doses.iter() {
        let dvh = aggregate::dvh_by_structure(dose, &masks, axis);
        report::write_dvh(
            &dvh,
            &args.output,
            &format!("dvh_dose_{}", id),
            &format!("Dose plan {}", id),
        )?;
    }

    let summaries = aggregate::summaries_across_doses(&doses, &masks);
    for (id, outcome) in &summaries {
        report::print_series_failures(
            &format!("Dose plan {} summary skipped:", id),
            &outcome.failures,
        );
        report::print_table(
            &format!("Dose Plan {} Summary (Gy)", id),
            &report::summary_rows(&outcome.table),
        );

        let path = out_dir.join(format!("summary_dose_{}.csv", id));
        export::summary_to_csv(&outcome.table, &path)?;
        output::print_saved("Summary table", &path);
    }

    // 相对参考计划的差值
    let tables: Vec<(&DatasetId, &SummaryTable)> =
        summaries.iter().map(|(id, outcome)| (id, &outcome.table)).collect();
    let comparisons = compare::compare_to_reference(&tables, &reference, &structures)?;

    report::print_table(
        &format!("Differences vs Dose Plan {} (Gy)", reference),
        &report::difference_rows(&comparisons),
    );
    report::print_not_comparable(&comparisons);

    let diff_path = out_dir.join("differences.csv");
    export::differences_to_csv(&comparisons, &diff_path)?;
    output::print_saved("Difference table", &diff_path);

    // 每个结构的跨计划 DVH
    for structure in &structures {
        if let Some(mask) = masks.get(structure) {
            let pairs = aggregate::pairs_across_doses(&doses, mask);
            let table = aggregate::dvh_by_dataset(structure, &pairs, axis);
            report::write_dvh(
                &table,
                &args.output,
                &format!("dvh_{}", report::file_stem_for(structure)),
                &format!("{} across dose plans", structure),
            )?;
        }
    }

    output::print_done(&format!("Results written to '{}'", out_dir.display()));
    Ok(())
}
