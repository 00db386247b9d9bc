//! # DVH 数据模型
//!
//! 剂量轴与累积剂量体积直方图曲线。
//!
//! ## 依赖关系
//! - 被 `dvh/calculator.rs`, `dvh/aggregate.rs`, `dvh/plot.rs` 使用
//! - 无外部模块依赖

use crate::error::{DvhError, Result};

/// 单条剂量轴允许的最大 bin 数
const MAX_BINS: usize = 1_000_000;

/// 剂量轴：[0, step, 2*step, ..., < max_dose)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseAxis {
    max_dose: f64,
    step_size: f64,
}

impl DoseAxis {
    /// 多结构 / 多数据集显示使用的默认剂量轴
    pub const DISPLAY: DoseAxis = DoseAxis {
        max_dose: 70.0,
        step_size: 0.1,
    };

    /// 单结构计算原语的默认剂量轴
    pub const PRIMITIVE: DoseAxis = DoseAxis {
        max_dose: 65.0,
        step_size: 0.1,
    };

    pub fn new(max_dose: f64, step_size: f64) -> Result<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(DvhError::InvalidArgument(format!(
                "step size must be positive, got {}",
                step_size
            )));
        }
        if !(max_dose.is_finite() && max_dose > 0.0) {
            return Err(DvhError::InvalidArgument(format!(
                "max dose must be positive, got {}",
                max_dose
            )));
        }
        let axis = Self {
            max_dose,
            step_size,
        };
        if axis.len() > MAX_BINS {
            return Err(DvhError::InvalidArgument(format!(
                "dose axis {} Gy / {} Gy has more than {} bins",
                max_dose, step_size, MAX_BINS
            )));
        }
        Ok(axis)
    }

    pub const fn max_dose(&self) -> f64 {
        self.max_dose
    }

    pub const fn step_size(&self) -> f64 {
        self.step_size
    }

    /// bin 数量（上界不含 max_dose）
    pub fn len(&self) -> usize {
        (self.max_dose / self.step_size).ceil() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 所有 bin 的剂量值
    pub fn bins(&self) -> Vec<f64> {
        (0..self.len()).map(|i| i as f64 * self.step_size).collect()
    }
}

/// DVH 曲线上的一个点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DvhPoint {
    /// 剂量阈值（Gy）
    pub dose: f64,
    /// 受照剂量 >= dose 的体积百分比
    pub volume: f64,
}

/// 累积 DVH 曲线
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DvhCurve {
    pub points: Vec<DvhPoint>,
}

impl DvhCurve {
    pub fn volumes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.volume)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_axis_bins() {
        let bins = DoseAxis::DISPLAY.bins();
        assert_eq!(bins.len(), 700);
        assert_eq!(bins[0], 0.0);
        assert!((bins[699] - 69.9).abs() < 1e-9);
    }

    #[test]
    fn test_primitive_axis_excludes_upper_bound() {
        let bins = DoseAxis::PRIMITIVE.bins();
        assert_eq!(bins.len(), 650);
        assert!(bins.iter().all(|&b| b < 65.0));
    }

    #[test]
    fn test_axis_half_open() {
        let axis = DoseAxis::new(20.0, 10.0).unwrap();
        assert_eq!(axis.bins(), vec![0.0, 10.0]);

        let axis = DoseAxis::new(25.0, 10.0).unwrap();
        assert_eq!(axis.bins(), vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_axis_rejects_bad_parameters() {
        assert!(DoseAxis::new(70.0, 0.0).is_err());
        assert!(DoseAxis::new(70.0, -0.1).is_err());
        assert!(DoseAxis::new(0.0, 0.1).is_err());
        assert!(DoseAxis::new(f64::NAN, 0.1).is_err());
        assert!(DoseAxis::new(1e9, 1e-3).is_err());
    }
}
