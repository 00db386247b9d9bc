//! # 统一错误处理模块
//!
//! 定义 dvhtool 的所有错误类型，使用 `thiserror` 派生。
//!
//! 空结构（掩膜不选中任何体素）不是错误：DVH 退化为全零曲线，
//! 统计指标记为不可用。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// dvhtool 统一错误类型
#[derive(Error, Debug)]
pub enum DvhError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 计算错误
    // ─────────────────────────────────────────────────────────────
    #[error("Shape mismatch: dose grid {dose:?} vs mask grid {mask:?}")]
    ShapeMismatch { dose: [usize; 3], mask: [usize; 3] },

    #[error("Duplicate structure '{0}' in segmentation")]
    DuplicateStructure(String),

    #[error("Duplicate dataset id '{0}'")]
    DuplicateDataset(String),

    // ─────────────────────────────────────────────────────────────
    // 比较错误
    // ─────────────────────────────────────────────────────────────
    #[error("No common structures found across the segmentations")]
    NoCommonStructures,

    #[error("Structure '{0}' is not available in every compared dataset")]
    MissingStructure(String),

    #[error("Unknown dataset id '{0}'")]
    UnknownDataset(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, DvhError>;
