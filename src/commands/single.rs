//! # single 命令实现
//!
//! 单剂量体 + 单套分割的完整分析。
//!
//! ## 功能
//! - 按结构计算 DVH，输出长表 CSV 和多序列图表
//! - 剂量汇总表（终端表格 + CSV）
//! - 约束合规检查（内置默认约束或 `--constraints` CSV）
//!
//! ## 依赖关系
//! - 使用 `cli/single.rs` 定义的参数
//! - 使用 `commands/inputs.rs`, `commands/report.rs`
//! - 使用 `dvh/` 计算

use crate::cli::single::SingleArgs;
use crate::commands::{inputs, report};
use crate::dvh::{aggregate, compliance, export, ComplianceReport};
use crate::error::Result;
use crate::models::default_constraints;
use crate::parsers;
use crate::utils::output;

/// 执行 single 命令
pub fn execute(args: SingleArgs) -> Result<()> {
    output::print_header("Dose-Volume Analysis");

    let axis = args.axis.axis()?;
    let constraints = match &args.constraints {
        Some(path) => {
            let constraints = parsers::constraints::read_constraints(path)?;
            output::print_info(&format!(
                "Loaded {} constraints from '{}'",
                constraints.len(),
                path.display()
            ));
            constraints
        }
        None => default_constraints(),
    };

    let out_dir = &args.output.output_dir;
    inputs::prepare_output_dir(out_dir)?;

    let dose = inputs::load_dose(&args.dose)?;
    let masks = inputs::load_segmentation(&args.masks, &args.load)?;

    output::print_info(&format!(
        "Dose axis: 0 - {} Gy, step {} Gy ({} bins)",
        axis.max_dose(),
        axis.step_size(),
        axis.len()
    ));

    // DVH
    let dvh = aggregate::dvh_by_structure(&dose, &masks, axis);
    report::write_dvh(&dvh, &args.output, "dvh", "Dose-Volume Histogram")?;

    // 剂量汇总
    let summary = aggregate::summary_by_structure(&dose, &masks);
    report::print_series_failures("Summary skipped:", &summary.failures);
    report::print_table("Dose Summary (Gy)", &report::summary_rows(&summary.table));

    let summary_path = out_dir.join("summary.csv");
    export::summary_to_csv(&summary.table, &summary_path)?;
    output::print_saved("Summary table", &summary_path);

    // 合规检查
    let verdicts = compliance::evaluate(&summary.table, &constraints);
    report::print_table("Compliance Check", &report::compliance_rows(&verdicts));

    let compliance_path = out_dir.join("compliance.csv");
    export::compliance_to_csv(&verdicts, &compliance_path)?;
    output::print_saved("Compliance table", &compliance_path);

    let tally = ComplianceReport::from_verdicts(&verdicts);
    output::print_separator();
    let message = format!(
        "{} constraints: {} pass, {} fail, {} unchecked, {} not evaluable",
        tally.total(),
        tally.passed,
        tally.failed,
        tally.unchecked,
        tally.not_evaluable
    );
    if tally.failed > 0 {
        output::print_warning(&message);
    } else {
        output::print_success(&message);
    }

    output::print_done(&format!("Results written to '{}'", out_dir.display()));
    Ok(())
}
