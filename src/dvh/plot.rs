//! # DVH 图表生成
//!
//! 使用 `plotters` 库绘制多序列 DVH 曲线。
//!
//! ## 功能
//! - 每个结构 / 数据集一条曲线，共享剂量轴
//! - 图例显示序列名
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `dvh/aggregate.rs` 的 DvhTable 结构
//! - 使用 `plotters` 渲染图表

use crate::dvh::aggregate::DvhTable;
use crate::error::{DvhError, Result};

use plotters::prelude::*;
use std::path::Path;

/// 生成 DVH 图表
pub fn generate_dvh_plot(
    table: &DvhTable,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_dvh_chart(&root, table, title)?;
        root.present().map_err(|e| DvhError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_dvh_chart(&root, table, title)?;
        root.present().map_err(|e| DvhError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 绘制 DVH 图表的核心逻辑
fn draw_dvh_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    table: &DvhTable,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| DvhError::Other(format!("{:?}", e)))?;

    let x_max = table.axis.max_dose();

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..105.0)
        .map_err(|e| DvhError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Dose (Gy)")
        .y_desc("Volume (%)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| DvhError::Other(format!("{:?}", e)))?;

    for (i, series) in table.series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();

        chart
            .draw_series(LineSeries::new(
                series.curve.points.iter().map(|p| (p.dose, p.volume)),
                color.stroke_width(2),
            ))
            .map_err(|e| DvhError::Other(format!("{:?}", e)))?
            .label(series.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    if !table.series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 14))
            .draw()
            .map_err(|e| DvhError::Other(format!("{:?}", e)))?;
    }

    Ok(())
}
