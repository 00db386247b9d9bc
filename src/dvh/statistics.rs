//! # 剂量统计
//!
//! 计算单个结构的六项剂量指标：平均、最大、最小剂量以及 D95/D50/D5。
//!
//! Dxx 表示至少 xx% 结构体积接受的剂量，即剂量分布的第 (100 - xx) 百分位数。
//! 百分位数在相邻秩之间线性插值。空结构的指标无定义，记为 None。
//!
//! ## 依赖关系
//! - 被 `dvh/aggregate.rs` 调用
//! - 使用 `dvh/selector.rs` 选择体素
//! - 使用 `models/summary.rs` 的 SummaryRow 结构

use crate::dvh::selector;
use crate::error::Result;
use crate::models::{DoseMetrics, DoseVolume, StructureMask, SummaryRow};

/// 计算结构的汇总行
pub fn summarize(structure: &str, dose: &DoseVolume, mask: &StructureMask) -> Result<SummaryRow> {
    let doses = selector::select_voxels(dose, mask)?;
    Ok(SummaryRow {
        structure: structure.to_string(),
        voxel_count: doses.len(),
        metrics: metrics_from_doses(doses),
    })
}

/// 由体素剂量计算指标，空输入返回 None
pub fn metrics_from_doses(mut doses: Vec<f64>) -> Option<DoseMetrics> {
    if doses.is_empty() {
        return None;
    }

    // 含 NaN 时六项指标均为 NaN
    if doses.iter().any(|d| d.is_nan()) {
        return Some(DoseMetrics {
            mean: f64::NAN,
            max: f64::NAN,
            min: f64::NAN,
            d95: f64::NAN,
            d50: f64::NAN,
            d5: f64::NAN,
        });
    }

    doses.sort_by(f64::total_cmp);

    let mean = doses.iter().sum::<f64>() / doses.len() as f64;

    Some(DoseMetrics {
        mean,
        max: doses[doses.len() - 1],
        min: doses[0],
        d95: percentile(&doses, 5.0),
        d50: percentile(&doses, 50.0),
        d5: percentile(&doses, 95.0),
    })
}

/// 已排序数据的百分位数（线性插值），`q` 取值 0-100
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_metrics_basic() {
        let doses: Vec<f64> = (1..=11).map(|i| i as f64).collect();
        let m = metrics_from_doses(doses).unwrap();

        assert_eq!(m.mean, 6.0);
        assert_eq!(m.max, 11.0);
        assert_eq!(m.min, 1.0);
        assert_eq!(m.d50, 6.0);
        // rank = 0.05 * 10 = 0.5 -> 1.5
        assert!((m.d95 - 1.5).abs() < 1e-12);
        // rank = 0.95 * 10 = 9.5 -> 10.5
        assert!((m.d5 - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_dose_ordering_of_percentiles() {
        let doses = vec![12.0, 55.1, 3.3, 48.0, 20.0, 60.2, 0.5];
        let m = metrics_from_doses(doses).unwrap();
        assert!(m.min <= m.d95 && m.d95 <= m.d50 && m.d50 <= m.d5 && m.d5 <= m.max);
    }

    #[test]
    fn test_single_voxel() {
        let m = metrics_from_doses(vec![42.0]).unwrap();
        assert_eq!(m.values(), [42.0; 6]);
    }

    #[test]
    fn test_nan_dose_propagates_to_every_metric() {
        let m = metrics_from_doses(vec![10.0, f64::NAN, 20.0]).unwrap();
        assert!(m.values().iter().all(|v| v.is_nan()));

        let m = metrics_from_doses(vec![10.0, -f64::NAN, 20.0]).unwrap();
        assert!(m.min.is_nan() && m.max.is_nan());
    }

    #[test]
    fn test_empty_selection_is_unavailable() {
        assert!(metrics_from_doses(Vec::new()).is_none());

        let dose = DoseVolume::new(Array3::from_elem((2, 2, 2), 10.0));
        let mask = StructureMask::new(Array3::from_elem((2, 2, 2), false));
        let row = summarize("Eye_L", &dose, &mask).unwrap();
        assert_eq!(row.voxel_count, 0);
        assert!(row.metrics.is_none());
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let values: Vec<f64> = (0..64).map(|i| (i as f64 * 1.37).sin() * 30.0 + 30.0).collect();
        let dose = DoseVolume::new(Array3::from_shape_vec((4, 4, 4), values).unwrap());
        let mask = StructureMask::from_values(&dose.data().mapv(|d| d - 25.0));

        let first = summarize("Brain", &dose, &mask).unwrap();
        let second = summarize("Brain", &dose, &mask).unwrap();

        let a = first.metrics.unwrap().values();
        let b = second.metrics.unwrap().values();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}
