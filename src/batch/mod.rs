//! # 批量处理模块
//!
//! 提供结构掩膜目录的批量读取能力。
//!
//! ## 功能
//! - 收集匹配的掩膜文件列表
//! - 并行读取
//! - 进度反馈与失败统计
//!
//! ## 依赖关系
//! - 被 `commands/inputs.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::{collect_masks, MaskPattern, DEFAULT_MASK_PATTERN};
pub use runner::{BatchResult, BatchRunner, ProcessResult};
