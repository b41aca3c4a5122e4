//! Ledger Charts - static run-volume charts from ledger CSV exports
//!
//! Reads the node and run exports, counts runs per day, per prompt type and
//! per run context, and writes one PNG chart for each.

pub mod charts;
pub mod config;
pub mod data;
pub mod logging;
pub mod report;

pub use charts::{ChartData, ChartKind, ChartPlotter};
pub use config::{ChartConfig, ProjectPaths};
pub use report::{build_report, generate_charts, ChartOutcome, ChartReport, SkipReason};
