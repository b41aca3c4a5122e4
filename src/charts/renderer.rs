//! Static Chart Renderer
//! Draws aggregate series to PNG files with plotters.
//!
//! Layout for every chart:
//! 1. Caption (chart title) across the top
//! 2. Plot area with light grid, y axis starting at zero
//! 3. Axis descriptions below and left of the plot, with label areas sized
//!    so tick labels are not clipped

use crate::charts::plotter::ChartLabels;
use crate::data::{CategoryCount, DailyCount};
use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

// Colors
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180); // Blue
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 22;
const LABEL_SIZE: u32 = 13;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No data points to draw")]
    EmptySeries,
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

fn drawing_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Line chart of run counts over calendar dates.
    pub fn render_line_chart(
        path: &Path,
        labels: &ChartLabels,
        points: &[DailyCount],
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(RenderError::EmptySeries);
        };
        let (x_start, x_end) = Self::date_range(first.date, last.date);
        let y_top = Self::y_upper_bound(points.iter().map(|p| p.count));

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(labels.title, (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_start..x_end, 0usize..y_top)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(GRID_COLOR.mix(0.6).stroke_width(1))
            .label_style((FONT, LABEL_SIZE))
            .x_labels(8)
            .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
            .x_desc(labels.x_desc)
            .y_desc(labels.y_desc)
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(
                LineSeries::new(points.iter().map(|p| (p.date, p.count)), &LINE_COLOR)
                    .point_size(3),
            )
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Bar chart of run counts per category, bars in series order.
    pub fn render_bar_chart(
        path: &Path,
        labels: &ChartLabels,
        bars: &[CategoryCount],
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if bars.is_empty() {
            return Err(RenderError::EmptySeries);
        }
        let n = bars.len();
        let y_top = Self::y_upper_bound(bars.iter().map(|b| b.count));

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(labels.title, (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), 0usize..y_top)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(GRID_COLOR.mix(0.6).stroke_width(1))
            .label_style((FONT, LABEL_SIZE))
            .x_labels(n)
            .x_label_formatter(&|v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => bars
                    .get(*i)
                    .map(|b| b.display_label().to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(labels.x_desc)
            .y_desc(labels.y_desc)
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(8)
                    .data(bars.iter().enumerate().map(|(i, b)| (i, b.count))),
            )
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Date axis range; a single day is padded on both sides.
    fn date_range(first: NaiveDate, last: NaiveDate) -> (NaiveDate, NaiveDate) {
        if first < last {
            return (first, last);
        }
        (
            first.pred_opt().unwrap_or(first),
            last.succ_opt().unwrap_or(last),
        )
    }

    /// Upper bound of the count axis, about 10% above the largest value.
    fn y_upper_bound(counts: impl Iterator<Item = usize>) -> usize {
        let max = counts.max().unwrap_or(0);
        max + max / 10 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_day_range_is_padded() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let (start, end) = StaticChartRenderer::date_range(day, day);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }

    #[test]
    fn multi_day_range_is_unchanged() {
        let a = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(StaticChartRenderer::date_range(a, b), (a, b));
    }

    #[test]
    fn y_bound_leaves_headroom() {
        assert_eq!(StaticChartRenderer::y_upper_bound([1usize].into_iter()), 2);
        assert_eq!(StaticChartRenderer::y_upper_bound([40usize, 7].into_iter()), 45);
        assert_eq!(StaticChartRenderer::y_upper_bound(std::iter::empty()), 1);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let labels = ChartLabels {
            title: "t",
            x_desc: "x",
            y_desc: "y",
        };
        assert!(matches!(
            StaticChartRenderer::render_line_chart(&path, &labels, &[], (320, 240)),
            Err(RenderError::EmptySeries)
        ));
        assert!(matches!(
            StaticChartRenderer::render_bar_chart(&path, &labels, &[], (320, 240)),
            Err(RenderError::EmptySeries)
        ));
        assert!(!path.exists());
    }
}
