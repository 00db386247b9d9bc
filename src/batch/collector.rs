//! # 掩膜文件收集
//!
//! 在分割目录中查找结构掩膜文件。
//!
//! ## 功能
//! - 逗号分隔的文件名模式（`*` 与 `?` 通配）
//! - 可选递归搜索子目录
//! - 结果按路径排序，保证结构顺序稳定
//!
//! ## 依赖关系
//! - 被 `commands/inputs.rs` 调用
//! - 使用 `walkdir` 遍历目录

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 默认掩膜文件模式
pub const DEFAULT_MASK_PATTERN: &str = "*.nii,*.nii.gz";

/// 文件名模式，任一备选匹配即可
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPattern {
    alternatives: Vec<String>,
}

impl MaskPattern {
    /// 解析 `*.nii,*.nii.gz` 形式的模式；全空时退回默认模式
    pub fn parse(list: &str) -> Self {
        let alternatives: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if alternatives.is_empty() {
            return Self::default();
        }
        Self { alternatives }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.alternatives
            .iter()
            .any(|alt| wildcard_match(alt.as_bytes(), file_name.as_bytes()))
    }
}

impl Default for MaskPattern {
    fn default() -> Self {
        Self::parse(DEFAULT_MASK_PATTERN)
    }
}

fn wildcard_match(pattern: &[u8], name: &[u8]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((b'*', rest)) => (0..=name.len()).any(|skip| wildcard_match(rest, &name[skip..])),
        Some((&p, rest)) => match name.split_first() {
            Some((&c, tail)) if p == b'?' || p == c => wildcard_match(rest, tail),
            _ => false,
        },
    }
}

/// 收集目录中匹配模式的文件，按路径排序
///
/// 目录不存在时返回空列表。
pub fn collect_masks(dir: &Path, pattern: &MaskPattern, recursive: bool) -> Vec<PathBuf> {
    let depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| pattern.matches(name))
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_pattern_matches() {
        let pattern = MaskPattern::default();
        assert!(pattern.matches("Brain.nii"));
        assert!(pattern.matches("Eye_L.nii.gz"));
        assert!(!pattern.matches("dose.csv"));
        assert!(!pattern.matches("Brain.nii.bak"));

        let single = MaskPattern::parse(" Eye_?.nii ,");
        assert!(single.matches("Eye_L.nii"));
        assert!(!single.matches("Eye_LR.nii"));
        assert!(!single.matches("Eye_L.nii.gz"));
    }

    #[test]
    fn test_empty_pattern_falls_back_to_default() {
        assert_eq!(MaskPattern::parse(" , "), MaskPattern::default());
    }

    #[test]
    fn test_collect_sorted_masks() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Eye_L.nii.gz", "Brain.nii", "notes.txt", "Chiasm.nii.gz"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("Lens.nii"), b"").unwrap();

        let pattern = MaskPattern::default();
        let names: Vec<String> = collect_masks(dir.path(), &pattern, false)
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Brain.nii", "Chiasm.nii.gz", "Eye_L.nii.gz"]);

        assert_eq!(collect_masks(dir.path(), &pattern, true).len(), 4);
    }

    #[test]
    fn test_collect_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = MaskPattern::default();
        assert!(collect_masks(&dir.path().join("absent"), &pattern, false).is_empty());
    }
}
