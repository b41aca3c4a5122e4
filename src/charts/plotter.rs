//! Chart Plotter Module
//! Chart definitions and dispatch from aggregate series to image files.

use crate::charts::renderer::{RenderError, StaticChartRenderer};
use crate::data::{CategoryCount, DailyCount};
use std::path::PathBuf;

/// The three charts produced from the run exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    RunsPerDay,
    RunsByPromptType,
    RunsByRunContext,
}

impl ChartKind {
    /// Chart kinds in the order they are generated.
    pub const ALL: [ChartKind; 3] = [
        ChartKind::RunsPerDay,
        ChartKind::RunsByPromptType,
        ChartKind::RunsByRunContext,
    ];

    /// File stem, also used in log lines.
    pub fn stem(self) -> &'static str {
        match self {
            ChartKind::RunsPerDay => "runs_per_day",
            ChartKind::RunsByPromptType => "runs_by_prompt_type",
            ChartKind::RunsByRunContext => "runs_by_run_context",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.png", self.stem())
    }

    pub fn labels(self) -> ChartLabels {
        match self {
            ChartKind::RunsPerDay => ChartLabels {
                title: "MindsEye Runs per Day",
                x_desc: "Date",
                y_desc: "Run count",
            },
            ChartKind::RunsByPromptType => ChartLabels {
                title: "Runs by Prompt Type",
                x_desc: "Prompt type",
                y_desc: "Run count",
            },
            ChartKind::RunsByRunContext => ChartLabels {
                title: "Runs by Surface (run_context)",
                x_desc: "Run context",
                y_desc: "Run count",
            },
        }
    }
}

/// Title and axis descriptions for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: &'static str,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
}

/// Series data ready to be drawn.
#[derive(Debug, Clone)]
pub enum ChartData {
    Daily(Vec<DailyCount>),
    Categories(Vec<CategoryCount>),
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Daily(points) => points.is_empty(),
            ChartData::Categories(bars) => bars.is_empty(),
        }
    }
}

/// Writes chart images into a single output directory.
pub struct ChartPlotter {
    charts_dir: PathBuf,
    size: (u32, u32),
}

impl ChartPlotter {
    pub fn new(charts_dir: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            charts_dir: charts_dir.into(),
            size,
        }
    }

    /// Output path for a chart kind.
    pub fn output_path(&self, kind: ChartKind) -> PathBuf {
        self.charts_dir.join(kind.file_name())
    }

    /// Render `data` for `kind`, overwriting any existing file.
    pub fn plot(&self, kind: ChartKind, data: &ChartData) -> Result<PathBuf, RenderError> {
        if data.is_empty() {
            return Err(RenderError::EmptySeries);
        }

        let path = self.output_path(kind);
        let labels = kind.labels();

        match data {
            ChartData::Daily(points) => {
                StaticChartRenderer::render_line_chart(&path, &labels, points, self.size)?
            }
            ChartData::Categories(bars) => {
                StaticChartRenderer::render_bar_chart(&path, &labels, bars, self.size)?
            }
        }

        Ok(path)
    }
}
