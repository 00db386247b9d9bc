//! # NIfTI-1 体数据解析器
//!
//! 读取单文件 NIfTI-1 (`.nii` / `.nii.gz`) 三维体数据，转换为 `Array3<f64>`。
//!
//! ## 头部字段（348 字节）
//! ```text
//! offset  0   i32      sizeof_hdr (= 348，同时用于判断字节序)
//! offset 40   i16[8]   dim
//! offset 70   i16      datatype
//! offset 72   i16      bitpix
//! offset 108  f32      vox_offset
//! offset 112  f32      scl_slope
//! offset 116  f32      scl_inter
//! offset 344  [u8; 4]  magic ("n+1\0")
//! ```
//!
//! 体素按 Fortran 顺序存储（x 变化最快），第 4 维只接受长度 1。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `flate2` 解压 `.gz`
//! - 使用 `ndarray` 构造三维数组

use crate::error::{DvhError, Result};

use flate2::read::GzDecoder;
use ndarray::{Array3, ShapeBuilder};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const HEADER_SIZE: usize = 348;
const MAGIC_SINGLE_FILE: &[u8; 4] = b"n+1\0";

/// 体素数据类型（NIfTI datatype 代码）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataType {
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl DataType {
    fn from_code(code: i16) -> Option<Self> {
        match code {
            2 => Some(DataType::U8),
            4 => Some(DataType::I16),
            8 => Some(DataType::I32),
            16 => Some(DataType::F32),
            64 => Some(DataType::F64),
            256 => Some(DataType::I8),
            512 => Some(DataType::U16),
            768 => Some(DataType::U32),
            _ => None,
        }
    }

    fn size(&self) -> usize {
        match self {
            DataType::U8 | DataType::I8 => 1,
            DataType::I16 | DataType::U16 => 2,
            DataType::I32 | DataType::U32 | DataType::F32 => 4,
            DataType::F64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

impl Endian {
    fn i16_at(&self, bytes: &[u8], offset: usize) -> i16 {
        let raw = [bytes[offset], bytes[offset + 1]];
        match self {
            Endian::Little => i16::from_le_bytes(raw),
            Endian::Big => i16::from_be_bytes(raw),
        }
    }

    fn u16_at(&self, bytes: &[u8], offset: usize) -> u16 {
        let raw = [bytes[offset], bytes[offset + 1]];
        match self {
            Endian::Little => u16::from_le_bytes(raw),
            Endian::Big => u16::from_be_bytes(raw),
        }
    }

    fn bytes4(bytes: &[u8], offset: usize) -> [u8; 4] {
        [
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]
    }

    fn i32_at(&self, bytes: &[u8], offset: usize) -> i32 {
        let raw = Self::bytes4(bytes, offset);
        match self {
            Endian::Little => i32::from_le_bytes(raw),
            Endian::Big => i32::from_be_bytes(raw),
        }
    }

    fn u32_at(&self, bytes: &[u8], offset: usize) -> u32 {
        let raw = Self::bytes4(bytes, offset);
        match self {
            Endian::Little => u32::from_le_bytes(raw),
            Endian::Big => u32::from_be_bytes(raw),
        }
    }

    fn f32_at(&self, bytes: &[u8], offset: usize) -> f32 {
        let raw = Self::bytes4(bytes, offset);
        match self {
            Endian::Little => f32::from_le_bytes(raw),
            Endian::Big => f32::from_be_bytes(raw),
        }
    }

    fn f64_at(&self, bytes: &[u8], offset: usize) -> f64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[offset..offset + 8]);
        match self {
            Endian::Little => f64::from_le_bytes(raw),
            Endian::Big => f64::from_be_bytes(raw),
        }
    }

    fn value_at(&self, bytes: &[u8], offset: usize, dtype: DataType) -> f64 {
        match dtype {
            DataType::U8 => bytes[offset] as f64,
            DataType::I8 => bytes[offset] as i8 as f64,
            DataType::I16 => self.i16_at(bytes, offset) as f64,
            DataType::U16 => self.u16_at(bytes, offset) as f64,
            DataType::I32 => self.i32_at(bytes, offset) as f64,
            DataType::U32 => self.u32_at(bytes, offset) as f64,
            DataType::F32 => self.f32_at(bytes, offset) as f64,
            DataType::F64 => self.f64_at(bytes, offset),
        }
    }
}

/// 读取 `.nii` 或 `.nii.gz` 文件
pub fn read_volume(path: &Path) -> Result<Array3<f64>> {
    let bytes = read_bytes(path)?;
    parse_volume(&bytes, &path.display().to_string())
}

/// 读取文件字节，`.gz` 结尾时透明解压
fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| DvhError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_gz = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    let mut reader: Box<dyn Read> = if is_gz {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| DvhError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(bytes)
}

/// 从内存中的 NIfTI-1 字节流解析三维体数据
pub fn parse_volume(bytes: &[u8], source: &str) -> Result<Array3<f64>> {
    let fail = |reason: String| DvhError::ParseError {
        format: "NIfTI".to_string(),
        path: source.to_string(),
        reason,
    };

    if bytes.len() < HEADER_SIZE {
        return Err(fail(format!(
            "file is {} bytes, shorter than the {}-byte header",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let endian = if Endian::Little.i32_at(bytes, 0) == HEADER_SIZE as i32 {
        Endian::Little
    } else if Endian::Big.i32_at(bytes, 0) == HEADER_SIZE as i32 {
        Endian::Big
    } else {
        return Err(fail("sizeof_hdr is not 348".to_string()));
    };

    if &bytes[344..348] != MAGIC_SINGLE_FILE {
        return Err(fail(
            "missing 'n+1' magic (only single-file NIfTI-1 is supported)".to_string(),
        ));
    }

    let ndim = endian.i16_at(bytes, 40);
    if !(1..=7).contains(&ndim) {
        return Err(fail(format!("invalid dimension count {}", ndim)));
    }

    let mut shape = [1usize; 3];
    for axis in 0..ndim as usize {
        let extent = endian.i16_at(bytes, 42 + 2 * axis);
        if extent < 1 {
            return Err(fail(format!("dim[{}] = {} is not positive", axis + 1, extent)));
        }
        if axis < 3 {
            shape[axis] = extent as usize;
        } else if extent != 1 {
            return Err(DvhError::UnsupportedFormat(format!(
                "{}: dim[{}] = {}, only 3D volumes are supported",
                source,
                axis + 1,
                extent
            )));
        }
    }

    let code = endian.i16_at(bytes, 70);
    let dtype = DataType::from_code(code)
        .ok_or_else(|| fail(format!("unsupported datatype code {}", code)))?;

    let vox_offset = endian.f32_at(bytes, 108);
    if !vox_offset.is_finite() || vox_offset < 0.0 || vox_offset as f64 > bytes.len() as f64 {
        return Err(fail(format!(
            "invalid vox_offset {} for a {}-byte file",
            vox_offset,
            bytes.len()
        )));
    }
    let start = (vox_offset as usize).max(HEADER_SIZE);

    let count = shape[0] * shape[1] * shape[2];
    let voxel_bytes = count
        .checked_mul(dtype.size())
        .ok_or_else(|| fail(format!("voxel count {} overflows", count)))?;
    let end = start
        .checked_add(voxel_bytes)
        .ok_or_else(|| fail(format!("voxel data past offset {} overflows", start)))?;
    if bytes.len() < end {
        return Err(fail(format!(
            "expected {} voxel bytes after offset {}, found {}",
            voxel_bytes,
            start,
            bytes.len().saturating_sub(start)
        )));
    }

    let slope = endian.f32_at(bytes, 112) as f64;
    let inter = endian.f32_at(bytes, 116) as f64;
    let scaled = slope != 0.0 && slope.is_finite() && inter.is_finite();

    let data: Vec<f64> = (0..count)
        .map(|i| {
            let raw = endian.value_at(bytes, start + i * dtype.size(), dtype);
            if scaled {
                raw * slope + inter
            } else {
                raw
            }
        })
        .collect();

    Array3::from_shape_vec((shape[0], shape[1], shape[2]).f(), data)
        .map_err(|e| fail(e.to_string()))
}
