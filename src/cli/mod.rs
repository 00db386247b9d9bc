//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `single`: 单剂量 + 单套分割
//! - `segmentations`: 单剂量 + 多套分割比较
//! - `doses`: 多剂量计划 + 单套分割比较
//! - `constraints`: 查看 / 导出默认约束表
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, single, compare, constraints

pub mod common;
pub mod compare;
pub mod constraints;
pub mod single;

use clap::{Parser, Subcommand};

/// dvhtool - 放射治疗剂量体积分析工具
#[derive(Parser)]
#[command(name = "dvhtool")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Dose-volume histogram analysis for radiotherapy plans", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one dose volume with one segmentation (DVH, summary, compliance)
    Single(single::SingleArgs),

    /// Compare several segmentations of the same patient under one dose
    Segmentations(compare::SegmentationsArgs),

    /// Compare several dose plans over one segmentation
    Doses(compare::DosesArgs),

    /// Show the built-in clinical constraint table
    Constraints(constraints::ConstraintsArgs),
}
