//! # single 子命令 CLI 定义
//!
//! 单剂量体 + 单套分割：DVH、剂量汇总和约束合规检查。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/single.rs`

use crate::cli::common::{AxisArgs, LoadArgs, OutputArgs};

use clap::Args;
use std::path::PathBuf;

/// single 子命令参数
#[derive(Args, Debug)]
pub struct SingleArgs {
    /// Dose volume (.nii or .nii.gz)
    #[arg(short, long)]
    pub dose: PathBuf,

    /// Segmentation directory with one mask file per structure
    #[arg(short, long)]
    pub masks: PathBuf,

    /// Constraint table CSV (Structure,Constraint Type,Level); built-in defaults if omitted
    #[arg(short, long)]
    pub constraints: Option<PathBuf>,

    #[command(flatten)]
    pub axis: AxisArgs,

    #[command(flatten)]
    pub load: LoadArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}
