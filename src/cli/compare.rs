//! # 比较子命令 CLI 定义
//!
//! - `segmentations`: 同一剂量下比较多套分割
//! - `doses`: 同一分割下比较多个剂量计划
//!
//! 数据集 id 为输入顺序的 1 起始编号，最多 5 个数据集。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/segmentations.rs`, `commands/doses.rs`

use crate::cli::common::{AxisArgs, LoadArgs, OutputArgs};

use clap::Args;
use std::path::PathBuf;

/// segmentations 子命令参数
#[derive(Args, Debug)]
pub struct SegmentationsArgs {
    /// Dose volume (.nii or .nii.gz)
    #[arg(short, long)]
    pub dose: PathBuf,

    /// Segmentation directories (2 to 5, ids follow the given order starting at 1)
    #[arg(short, long, required = true, num_args = 1..)]
    pub masks: Vec<PathBuf>,

    /// Id of the reference segmentation
    #[arg(short, long, default_value_t = 1)]
    pub reference: usize,

    /// Structures to compare, comma separated (default: all common structures)
    #[arg(short, long, value_delimiter = ',')]
    pub structures: Vec<String>,

    #[command(flatten)]
    pub axis: AxisArgs,

    #[command(flatten)]
    pub load: LoadArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// doses 子命令参数
#[derive(Args, Debug)]
pub struct DosesArgs {
    /// Dose volumes (2 to 5, ids follow the given order starting at 1)
    #[arg(short, long, required = true, num_args = 1..)]
    pub doses: Vec<PathBuf>,

    /// Segmentation directory with one mask file per structure
    #[arg(short, long)]
    pub masks: PathBuf,

    /// Id of the reference dose plan
    #[arg(short, long, default_value_t = 1)]
    pub reference: usize,

    /// Structures to compare, comma separated (default: every structure in the segmentation)
    #[arg(short, long, value_delimiter = ',')]
    pub structures: Vec<String>,

    #[command(flatten)]
    pub axis: AxisArgs,

    #[command(flatten)]
    pub load: LoadArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}
