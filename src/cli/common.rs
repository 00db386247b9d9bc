//! # 共享参数
//!
//! 各子命令共用的剂量轴、掩膜读取和输出参数。
//!
//! ## 依赖关系
//! - 被 `cli/single.rs`, `cli/compare.rs` 使用
//! - 使用 `models/dvh.rs` 构造剂量轴

use crate::batch::DEFAULT_MASK_PATTERN;
use crate::error::Result;
use crate::models::DoseAxis;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 每次比较最多的数据集数量
pub const MAX_DATASETS: usize = 5;

// ─────────────────────────────────────────────────────────────
// 剂量轴
// ─────────────────────────────────────────────────────────────

/// DVH 剂量轴参数
#[derive(Args, Debug, Clone)]
pub struct AxisArgs {
    /// Upper bound of the dose axis in Gy (exclusive)
    #[arg(long, env = "DVHTOOL_MAX_DOSE", default_value_t = DoseAxis::DISPLAY.max_dose())]
    pub max_dose: f64,

    /// Dose bin width in Gy
    #[arg(long, env = "DVHTOOL_STEP_SIZE", default_value_t = DoseAxis::DISPLAY.step_size())]
    pub step_size: f64,
}

impl AxisArgs {
    pub fn axis(&self) -> Result<DoseAxis> {
        DoseAxis::new(self.max_dose, self.step_size)
    }
}

// ─────────────────────────────────────────────────────────────
// 掩膜读取
// ─────────────────────────────────────────────────────────────

/// 结构掩膜目录读取参数
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Glob pattern for structure mask files inside a segmentation directory
    #[arg(long, default_value = DEFAULT_MASK_PATTERN)]
    pub pattern: String,

    /// Recurse into subdirectories of a segmentation directory
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs for reading masks (0 = auto)
    #[arg(short, long, env = "DVHTOOL_JOBS", default_value_t = 0)]
    pub jobs: usize,
}

// ─────────────────────────────────────────────────────────────
// 输出
// ─────────────────────────────────────────────────────────────

/// DVH 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PlotFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
}

impl PlotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PlotFormat::Png => "png",
            PlotFormat::Svg => "svg",
        }
    }
}

/// 输出参数
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory for CSV tables and DVH charts
    #[arg(short, long, env = "DVHTOOL_OUTPUT_DIR", default_value = "dvh_output")]
    pub output_dir: PathBuf,

    /// DVH chart format
    #[arg(short, long, value_enum, default_value = "png")]
    pub format: PlotFormat,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Skip chart generation (CSV tables only)
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}
