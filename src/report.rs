//! Report driver: load both exports, then build each chart in turn.
//!
//! Loading failures abort the whole run. After that every chart is
//! independent: a missing column, an empty series or a drawing failure only
//! affects its own chart.

use crate::charts::{ChartData, ChartKind, ChartPlotter};
use crate::config::{ChartConfig, ProjectPaths};
use crate::data::{
    Aggregation, DataLoader, DataProcessor, LoaderError, ProcessorError, PromptTypeAggregation,
};
use polars::prelude::DataFrame;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create charts directory {}: {source}", path.display())]
    ChartsDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoaderError),
}

/// Why a chart was not produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The run table lacks a column the chart needs.
    MissingColumn(&'static str),
    /// The node table lacks a column the chart needs.
    MissingNodeColumn(&'static str),
    /// The aggregate series came out empty.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    Written(PathBuf),
    Skipped(SkipReason),
    Failed(String),
}

/// Outcome of every chart, in generation order.
#[derive(Debug, Clone, Default)]
pub struct ChartReport {
    pub outcomes: Vec<(ChartKind, ChartOutcome)>,
}

impl ChartReport {
    pub fn outcome(&self, kind: ChartKind) -> Option<&ChartOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }

    pub fn written(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                ChartOutcome::Written(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(ChartKind, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(kind, outcome)| match outcome {
                ChartOutcome::Failed(msg) => Some((*kind, msg.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Load the exports and generate every chart.
pub fn generate_charts(
    paths: &ProjectPaths,
    config: &ChartConfig,
) -> Result<ChartReport, ReportError> {
    fs::create_dir_all(&paths.charts_dir).map_err(|source| ReportError::ChartsDir {
        path: paths.charts_dir.clone(),
        source,
    })?;

    let mut nodes = DataLoader::new();
    let nodes_df = nodes.load_csv(&paths.nodes_csv)?;
    let mut runs = DataLoader::new();
    let runs_df = runs.load_csv(&paths.runs_csv)?;

    let plotter = ChartPlotter::new(&paths.charts_dir, config.image_size());
    Ok(build_report(&plotter, nodes_df, runs_df))
}

/// Aggregate and render each chart from already loaded tables.
pub fn build_report(plotter: &ChartPlotter, nodes: &DataFrame, runs: &DataFrame) -> ChartReport {
    let mut report = ChartReport::default();

    for kind in ChartKind::ALL {
        let outcome = match aggregate(kind, nodes, runs) {
            Ok(Ok(data)) => render(plotter, kind, &data),
            Ok(Err(reason)) => {
                log_skip(kind, &reason);
                ChartOutcome::Skipped(reason)
            }
            Err(err) => {
                error!("Failed to aggregate {}: {}", kind.stem(), err);
                ChartOutcome::Failed(err.to_string())
            }
        };
        report.outcomes.push((kind, outcome));
    }

    report
}

/// Series for one chart, or the reason it is skipped.
fn aggregate(
    kind: ChartKind,
    nodes: &DataFrame,
    runs: &DataFrame,
) -> Result<Result<ChartData, SkipReason>, ProcessorError> {
    let data = match kind {
        ChartKind::RunsPerDay => match DataProcessor::runs_per_day(runs)? {
            Aggregation::MissingColumn(col) => Err(SkipReason::MissingColumn(col)),
            Aggregation::Counts(points) => Ok(ChartData::Daily(points)),
        },
        ChartKind::RunsByPromptType => {
            prompt_type_data(DataProcessor::runs_by_prompt_type(nodes, runs)?)
        }
        ChartKind::RunsByRunContext => match DataProcessor::runs_by_run_context(runs)? {
            Aggregation::MissingColumn(col) => Err(SkipReason::MissingColumn(col)),
            Aggregation::Counts(counts) => Ok(ChartData::Categories(counts)),
        },
    };

    Ok(data.and_then(|d| {
        if d.is_empty() {
            Err(SkipReason::NoData)
        } else {
            Ok(d)
        }
    }))
}

fn prompt_type_data(agg: PromptTypeAggregation) -> Result<ChartData, SkipReason> {
    match agg {
        PromptTypeAggregation::MissingRunColumn(col) => Err(SkipReason::MissingColumn(col)),
        PromptTypeAggregation::MissingNodeColumn(col) => Err(SkipReason::MissingNodeColumn(col)),
        PromptTypeAggregation::Counts {
            counts,
            duplicate_nodes,
        } => {
            if duplicate_nodes > 0 {
                warn!(
                    "Ignored {} node rows with a duplicate node_id; first match wins.",
                    duplicate_nodes
                );
            }
            Ok(ChartData::Categories(counts))
        }
    }
}

fn render(plotter: &ChartPlotter, kind: ChartKind, data: &ChartData) -> ChartOutcome {
    match plotter.plot(kind, data) {
        Ok(path) => {
            info!("Wrote {}", path.display());
            ChartOutcome::Written(path)
        }
        Err(err) => {
            error!("Failed to render {}: {}", kind.stem(), err);
            ChartOutcome::Failed(err.to_string())
        }
    }
}

fn log_skip(kind: ChartKind, reason: &SkipReason) {
    match reason {
        SkipReason::MissingColumn(col) => {
            info!("No {} column; skipping {} chart.", col, kind.stem())
        }
        SkipReason::MissingNodeColumn(col) => {
            info!("No {} column in nodes; skipping {} chart.", col, kind.stem())
        }
        SkipReason::NoData => info!("No data for {}.", kind.stem()),
    }
}
