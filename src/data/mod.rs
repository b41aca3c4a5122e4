//! Data module - CSV loading and aggregation

mod loader;
mod processor;
mod timestamp;

pub use loader::{has_column, string_values, DataLoader, LoaderError};
pub use processor::{
    count_by_label, Aggregation, CategoryCount, DailyCount, DataProcessor, NodeIndex,
    ProcessorError, PromptTypeAggregation, MISSING_CATEGORY,
};
pub use timestamp::{parse_run_time, run_date};
