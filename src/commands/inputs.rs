//! # 输入读取与校验
//!
//! 各子命令共用的输入处理：读取剂量体、批量读取分割目录、
//! 校验数据集数量与参考 id、选择比较结构。
//!
//! ## 依赖关系
//! - 被 `commands/` 各子命令使用
//! - 使用 `batch/` 并行读取掩膜
//! - 使用 `parsers/` 解码体数据

use crate::batch::{collect_masks, BatchRunner, MaskPattern, ProcessResult};
use crate::cli::common::{LoadArgs, MAX_DATASETS};
use crate::error::{DvhError, Result};
use crate::models::{DatasetId, DoseVolume, StructureMaskSet};
use crate::parsers;
use crate::utils::{output, progress};

use std::fs;
use std::path::Path;

/// 读取剂量体
pub fn load_dose(path: &Path) -> Result<DoseVolume> {
    let spinner = progress::create_spinner(&format!("Reading dose '{}'", path.display()));
    let result = parsers::read_dose(path);
    spinner.finish_and_clear();

    let dose = result?;
    let [nx, ny, nz] = dose.dim();
    match dose.max_dose() {
        Some(max) => output::print_success(&format!(
            "Loaded dose '{}' ({} x {} x {}, max {:.2} Gy)",
            path.display(),
            nx,
            ny,
            nz,
            max
        )),
        None => output::print_warning(&format!(
            "Loaded dose '{}' ({} x {} x {}) without any finite voxel",
            path.display(),
            nx,
            ny,
            nz
        )),
    }
    Ok(dose)
}

/// 并行读取分割目录中的所有结构掩膜
///
/// 单个文件失败或结构重名只打印警告；没有任何掩膜可用时返回错误。
pub fn load_segmentation(dir: &Path, load: &LoadArgs) -> Result<StructureMaskSet> {
    if !dir.is_dir() {
        return Err(DvhError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let files = collect_masks(dir, &MaskPattern::parse(&load.pattern), load.recursive);

    if files.is_empty() {
        return Err(DvhError::NoFilesFound {
            pattern: format!("{}/{}", dir.display(), load.pattern),
        });
    }

    let runner = BatchRunner::new(load.jobs);
    let result = runner.run(files, "Reading masks", |file| {
        let loaded = parsers::structure_name(file)
            .and_then(|name| parsers::read_mask(file).map(|mask| (name, mask)));
        ProcessResult::from_result(file, loaded)
    })?;

    output::print_failures(
        &format!("Failed to read {} mask file(s):", result.failed()),
        &result.failures,
    );

    // 同名结构只保留排序靠前的文件
    let mut masks = StructureMaskSet::new();
    let mut duplicates = Vec::new();
    for (file, (name, mask)) in result.items {
        if let Err(e) = masks.insert(name, mask) {
            duplicates.push((file, e.to_string()));
        }
    }
    output::print_failures(
        &format!("Ignored {} duplicate mask file(s):", duplicates.len()),
        &duplicates,
    );

    if masks.is_empty() {
        return Err(DvhError::Other(format!(
            "No structure mask could be read from '{}'",
            dir.display()
        )));
    }

    output::print_success(&format!(
        "Loaded {} structures from '{}'",
        masks.len(),
        dir.display()
    ));
    Ok(masks)
}

/// 校验比较数据集数量（2 到 5 个）
pub fn check_dataset_count(count: usize, what: &str) -> Result<()> {
    if count < 2 {
        return Err(DvhError::InvalidArgument(format!(
            "At least 2 {} are required for a comparison, got {}",
            what, count
        )));
    }
    if count > MAX_DATASETS {
        return Err(DvhError::InvalidArgument(format!(
            "At most {} {} can be compared, got {}",
            MAX_DATASETS, what, count
        )));
    }
    Ok(())
}

/// 校验 1 起始的参考数据集 id
pub fn reference_id(reference: usize, count: usize) -> Result<DatasetId> {
    if reference == 0 || reference > count {
        return Err(DvhError::UnknownDataset(reference.to_string()));
    }
    Ok(DatasetId::from(reference))
}

/// 选择参与比较的结构
///
/// 未指定时使用全部可用结构；指定但不可用的结构跳过并提示。
pub fn select_structures<'a, I>(requested: &[String], available: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let available: Vec<&str> = available.into_iter().collect();

    if requested.is_empty() {
        return Ok(available.iter().map(|s| s.to_string()).collect());
    }

    let mut selected = Vec::new();
    for name in requested {
        let name = name.trim();
        if name.is_empty() || selected.iter().any(|s: &String| s == name) {
            continue;
        }
        if available.contains(&name) {
            selected.push(name.to_string());
        } else {
            output::print_skip(&format!("Structure '{}' is not available in every dataset", name));
        }
    }

    if selected.is_empty() {
        return Err(DvhError::InvalidArgument(
            "None of the requested structures is available".to_string(),
        ));
    }
    Ok(selected)
}

/// 确保输出目录存在
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| DvhError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })
}
