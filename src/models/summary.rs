//! # 剂量统计数据模型
//!
//! 每个结构的六项剂量指标及其汇总表。
//!
//! ## 依赖关系
//! - 被 `dvh/statistics.rs`, `dvh/compare.rs`, `dvh/compliance.rs` 使用
//! - 被 `dvh/export.rs` 导出

/// 汇总表的指标列名（与 CSV 表头一致）
pub const METRIC_NAMES: [&str; 6] = ["Mean Dose", "Max Dose", "Min Dose", "D95", "D50", "D5"];

/// 单个结构的剂量指标（Gy）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseMetrics {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// 至少 95% 体积接受的剂量
    pub d95: f64,
    pub d50: f64,
    /// 至少 5% 体积接受的剂量
    pub d5: f64,
}

impl DoseMetrics {
    /// 按 `METRIC_NAMES` 顺序返回数值
    pub fn values(&self) -> [f64; 6] {
        [self.mean, self.max, self.min, self.d95, self.d50, self.d5]
    }

    /// 逐项相减：self - other
    pub fn delta(&self, other: &DoseMetrics) -> DoseMetrics {
        DoseMetrics {
            mean: self.mean - other.mean,
            max: self.max - other.max,
            min: self.min - other.min,
            d95: self.d95 - other.d95,
            d50: self.d50 - other.d50,
            d5: self.d5 - other.d5,
        }
    }
}

/// 汇总表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub structure: String,
    /// 结构内体素数
    pub voxel_count: usize,
    /// 空结构时为 None（指标无定义）
    pub metrics: Option<DoseMetrics>,
}

impl SummaryRow {
    pub fn is_empty(&self) -> bool {
        self.metrics.is_none()
    }
}

/// 结构名 → 指标行，保持构建时的顺序
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// 由完整的行列表一次性构建
    pub fn from_rows(rows: Vec<SummaryRow>) -> Self {
        Self { rows }
    }

    pub fn get(&self, structure: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.structure == structure)
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn structures(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.structure.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
