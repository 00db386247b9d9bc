//! # 解析器模块
//!
//! 提供剂量体、结构掩膜和约束表的读取。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: nifti, constraints

pub mod constraints;
pub mod nifti;

use crate::error::{DvhError, Result};
use crate::models::{DoseVolume, StructureMask};
use std::path::Path;

/// 支持的体数据文件后缀
pub const VOLUME_EXTENSIONS: [&str; 2] = [".nii", ".nii.gz"];

/// 由文件名推导结构名：取第一个 `.` 之前的部分
///
/// `Brain.nii.gz` -> `Brain`，`Eye_L.nii` -> `Eye_L`
pub fn structure_name(path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DvhError::InvalidArgument(format!("Invalid file name: {}", path.display())))?;

    let name = file_name.split('.').next().unwrap_or_default();
    if name.is_empty() {
        return Err(DvhError::InvalidArgument(format!(
            "Cannot derive a structure name from '{}'",
            file_name
        )));
    }
    Ok(name.to_string())
}

/// 检查文件后缀是否为支持的体数据格式
pub fn is_volume_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| {
            let lower = n.to_lowercase();
            VOLUME_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        })
        .unwrap_or(false)
}

fn ensure_volume_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(DvhError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    if !is_volume_file(path) {
        return Err(DvhError::UnsupportedFormat(format!(
            "{} (expected .nii or .nii.gz)",
            path.display()
        )));
    }
    Ok(())
}

/// 读取剂量体
pub fn read_dose(path: &Path) -> Result<DoseVolume> {
    ensure_volume_file(path)?;
    Ok(DoseVolume::new(nifti::read_volume(path)?))
}

/// 读取结构掩膜（非零体素视为在结构内）
pub fn read_mask(path: &Path) -> Result<StructureMask> {
    ensure_volume_file(path)?;
    Ok(StructureMask::from_values(&nifti::read_volume(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_structure_name() {
        assert_eq!(structure_name(Path::new("Brain.nii.gz")).unwrap(), "Brain");
        assert_eq!(structure_name(Path::new("/data/seg1/Eye_L.nii")).unwrap(), "Eye_L");
        assert_eq!(structure_name(Path::new("OpticNerve_R")).unwrap(), "OpticNerve_R");
        assert!(structure_name(Path::new(".hidden.nii")).is_err());
    }

    #[test]
    fn test_is_volume_file() {
        assert!(is_volume_file(&PathBuf::from("dose.nii")));
        assert!(is_volume_file(&PathBuf::from("Brain.NII.GZ")));
        assert!(!is_volume_file(&PathBuf::from("constraints.csv")));
        assert!(!is_volume_file(&PathBuf::from("archive.gz")));
    }

    #[test]
    fn test_read_dose_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dose.txt");
        std::fs::write(&path, "not a volume").unwrap();
        assert!(matches!(read_dose(&path), Err(DvhError::UnsupportedFormat(_))));
        assert!(matches!(
            read_mask(&dir.path().join("missing.nii")),
            Err(DvhError::FileNotFound { .. })
        ));
    }
}
