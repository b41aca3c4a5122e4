//! Charts module - Chart definitions and rendering

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartKind, ChartLabels, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer};
