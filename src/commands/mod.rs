//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `dvh/`, `models/`, `utils/`
//! - 子模块: single, segmentations, doses, constraints, inputs, report

pub mod constraints;
pub mod doses;
pub mod inputs;
pub mod report;
pub mod segmentations;
pub mod single;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Single(args) => single::execute(args),
        Commands::Segmentations(args) => segmentations::execute(args),
        Commands::Doses(args) => doses::execute(args),
        Commands::Constraints(args) => constraints::execute(args),
    }
}
