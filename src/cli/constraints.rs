//! # constraints 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/constraints.rs`

use clap::Args;
use std::path::PathBuf;

/// constraints 子命令参数
#[derive(Args, Debug)]
pub struct ConstraintsArgs {
    /// Write the built-in table to this CSV file for editing
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}
