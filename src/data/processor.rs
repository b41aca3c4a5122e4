//! Data Processor Module
//! Group-by/count aggregations behind each chart.

use super::loader::{has_column, string_values};
use super::timestamp::run_date;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Axis text for the bucket of runs whose category is null or has no
/// matching node. The bucket itself is `label: None`, so a real category
/// spelled the same way is still counted on its own.
pub const MISSING_CATEGORY: &str = "(missing)";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Runs counted on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Runs counted for one category label; `None` is the missing bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: Option<String>,
    pub count: usize,
}

impl CategoryCount {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(MISSING_CATEGORY)
    }
}

/// Result of an aggregation: either the counted series, or the name of the
/// column that had to be present for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregation<T> {
    MissingColumn(&'static str),
    Counts(Vec<T>),
}

impl<T> Aggregation<T> {
    pub fn counts(&self) -> Option<&[T]> {
        match self {
            Aggregation::Counts(counts) => Some(counts),
            Aggregation::MissingColumn(_) => None,
        }
    }
}

/// Prompt-type aggregation also depends on the node table's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptTypeAggregation {
    MissingRunColumn(&'static str),
    MissingNodeColumn(&'static str),
    Counts {
        counts: Vec<CategoryCount>,
        /// Node rows ignored because their `node_id` was already seen.
        duplicate_nodes: usize,
    },
}

/// Node lookup built once from the node table. First row per `node_id` wins.
#[derive(Debug, Default)]
pub struct NodeIndex {
    prompt_types: HashMap<String, Option<String>>,
    duplicates: usize,
}

impl NodeIndex {
    pub fn build(node_ids: Vec<Option<String>>, prompt_types: Vec<Option<String>>) -> Self {
        let mut index = NodeIndex::default();

        for (node_id, prompt_type) in node_ids.into_iter().zip(prompt_types) {
            let Some(node_id) = node_id else {
                continue;
            };
            if index.prompt_types.contains_key(&node_id) {
                index.duplicates += 1;
                continue;
            }
            index.prompt_types.insert(node_id, prompt_type);
        }

        index
    }

    /// Prompt type for a run's node reference; `None` when the reference is
    /// null, unmatched, or the node has no prompt type.
    pub fn prompt_type_of(&self, node_id: Option<&str>) -> Option<&str> {
        node_id
            .and_then(|id| self.prompt_types.get(id))
            .and_then(|pt| pt.as_deref())
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Handles the per-chart aggregations over run and node tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Count runs per calendar date, ascending by date.
    ///
    /// Unparsable or empty `run_time` values are left out of the count.
    pub fn runs_per_day(runs: &DataFrame) -> Result<Aggregation<DailyCount>, ProcessorError> {
        let Some(run_times) = string_values(runs, "run_time")? else {
            return Ok(Aggregation::MissingColumn("run_time"));
        };

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for date in run_times.iter().flatten().filter_map(|t| run_date(t)) {
            *per_day.entry(date).or_default() += 1;
        }

        let counts = per_day
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();

        Ok(Aggregation::Counts(counts))
    }

    /// Left-join runs to nodes on `node_id` and count runs per prompt type.
    pub fn runs_by_prompt_type(
        nodes: &DataFrame,
        runs: &DataFrame,
    ) -> Result<PromptTypeAggregation, ProcessorError> {
        let Some(run_node_ids) = string_values(runs, "node_id")? else {
            return Ok(PromptTypeAggregation::MissingRunColumn("node_id"));
        };

        for required in ["node_id", "prompt_type"] {
            if !has_column(nodes, required) {
                return Ok(PromptTypeAggregation::MissingNodeColumn(required));
            }
        }

        let node_ids = string_values(nodes, "node_id")?.unwrap_or_default();
        let prompt_types = string_values(nodes, "prompt_type")?.unwrap_or_default();
        let index = NodeIndex::build(node_ids, prompt_types);

        let counts = count_by_label(
            run_node_ids
                .iter()
                .map(|node_id| index.prompt_type_of(node_id.as_deref())),
        );

        Ok(PromptTypeAggregation::Counts {
            counts,
            duplicate_nodes: index.duplicates(),
        })
    }

    /// Count runs per `run_context`, descending by count.
    pub fn runs_by_run_context(
        runs: &DataFrame,
    ) -> Result<Aggregation<CategoryCount>, ProcessorError> {
        let Some(contexts) = string_values(runs, "run_context")? else {
            return Ok(Aggregation::MissingColumn("run_context"));
        };

        let counts = count_by_label(contexts.iter().map(|ctx| ctx.as_deref()));

        Ok(Aggregation::Counts(counts))
    }
}

/// Count occurrences per label, sorted by descending count then label, with
/// the missing bucket ahead of named labels on ties.
pub fn count_by_label<'a>(labels: impl Iterator<Item = Option<&'a str>>) -> Vec<CategoryCount> {
    let mut tally: HashMap<Option<&str>, usize> = HashMap::new();
    for label in labels {
        *tally.entry(label).or_default() += 1;
    }

    let mut counts: Vec<CategoryCount> = tally
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.map(str::to_string),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    counts
}
