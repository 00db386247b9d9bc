//! # constraints 命令实现
//!
//! 打印内置的临床剂量约束表，可选导出为可编辑的 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/constraints.rs` 定义的参数
//! - 使用 `parsers/constraints.rs` 写出 CSV

use crate::cli::constraints::ConstraintsArgs;
use crate::commands::report;
use crate::error::Result;
use crate::models::default_constraints;
use crate::parsers;
use crate::utils::output;

/// 执行 constraints 命令
pub fn execute(args: ConstraintsArgs) -> Result<()> {
    let constraints = default_constraints();
    report::print_table(
        "Default Clinical Constraints",
        &report::constraint_rows(&constraints),
    );

    if let Some(path) = &args.export {
        parsers::constraints::write_constraints(&constraints, path)?;
        output::print_saved("Constraint table", path);
        output::print_info("Edit the file and pass it to 'dvhtool single --constraints'");
    }

    Ok(())
}
