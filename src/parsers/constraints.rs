//! # 约束表 CSV 读写
//!
//! 约束表格式：
//! ```text
//! Structure,Constraint Type,Level
//! Brain,mean,30
//! BrainStem,max,54
//! ```
//!
//! 约束类型不区分大小写，限值单位为 Gy。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/constraint.rs`
//! - 使用 `csv` + `serde` 进行记录序列化

use crate::error::{DvhError, Result};
use crate::models::{ConstraintKind, ConstraintSpec};

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct ConstraintRecord {
    #[serde(rename = "Structure")]
    structure: String,
    #[serde(rename = "Constraint Type")]
    kind: String,
    #[serde(rename = "Level")]
    level: f64,
}

/// 读取约束表
pub fn read_constraints(path: &Path) -> Result<Vec<ConstraintSpec>> {
    if !path.is_file() {
        return Err(DvhError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut constraints = Vec::new();

    for (line, record) in rdr.deserialize::<ConstraintRecord>().enumerate() {
        let record = record?;
        // 表头占第 1 行
        let kind: ConstraintKind = record.kind.parse().map_err(|e: DvhError| DvhError::ParseError {
            format: "constraints CSV".to_string(),
            path: path.display().to_string(),
            reason: format!("line {}: {}", line + 2, e),
        })?;

        if !record.level.is_finite() {
            return Err(DvhError::ParseError {
                format: "constraints CSV".to_string(),
                path: path.display().to_string(),
                reason: format!("line {}: level must be a finite number", line + 2),
            });
        }

        constraints.push(ConstraintSpec::new(record.structure, kind, record.level));
    }

    Ok(constraints)
}

/// 写出约束表
pub fn write_constraints(constraints: &[ConstraintSpec], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for constraint in constraints {
        wtr.serialize(ConstraintRecord {
            structure: constraint.structure.clone(),
            kind: constraint.kind.to_string(),
            level: constraint.limit,
        })?;
    }

    wtr.flush().map_err(|e| DvhError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_constraints;
    use std::fs;

    #[test]
    fn test_read_constraints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constraints.csv");
        fs::write(
            &path,
            "Structure,Constraint Type,Level\nBrain,Mean,30\nTarget, min ,60.5\n",
        )
        .unwrap();

        let constraints = read_constraints(&path).unwrap();
        assert_eq!(
            constraints,
            vec![
                ConstraintSpec::new("Brain", ConstraintKind::Mean, 30.0),
                ConstraintSpec::new("Target", ConstraintKind::Min, 60.5),
            ]
        );
    }

    #[test]
    fn test_unknown_kind_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constraints.csv");
        fs::write(&path, "Structure,Constraint Type,Level\nBrain,mean,30\nEye,median,10\n")
            .unwrap();

        match read_constraints(&path) {
            Err(DvhError::ParseError { reason, .. }) => assert!(reason.contains("line 3")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_level_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constraints.csv");
        fs::write(&path, "Structure,Constraint Type,Level\nBrain,mean,high\n").unwrap();

        assert!(matches!(read_constraints(&path), Err(DvhError::CsvError(_))));
    }

    #[test]
    fn test_defaults_survive_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.csv");

        write_constraints(&default_constraints(), &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Structure,Constraint Type,Level\nBrain,mean,30"));

        assert_eq!(read_constraints(&path).unwrap(), default_constraints());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_constraints(&dir.path().join("none.csv")),
            Err(DvhError::FileNotFound { .. })
        ));
    }
}
