//! CSV Data Loader Module
//! Handles CSV export loading and column lookup using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// Loads a single CSV export into a DataFrame.
///
/// Every column is read as a string so that keys compare as text across
/// exports; empty fields become nulls.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let to_csv_error = |source| LoaderError::Csv {
            path: file_path.to_path_buf(),
            source,
        };

        // Schema length 0 keeps every column as String
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .map_err(to_csv_error)?
            .collect()
            .map_err(to_csv_error)?;

        Ok(&*self.df.insert(df))
    }
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Extract a column as optional strings, or `None` if the column is absent.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Option<Vec<Option<String>>>> {
    if !has_column(df, name) {
        return Ok(None);
    }

    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();

    Ok(Some(values))
}
