//! CSV Data Loader Module
//! Loads the solver's semicolon-delimited CSV files using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to load CSV {path}: {source}")]
    Csv { path: PathBuf, source: PolarsError },
    #[error("column error: {0}")]
    Column(#[from] PolarsError),
}

/// A solver output table loaded from a semicolon-delimited CSV file.
pub struct CsvTable {
    df: DataFrame,
}

impl CsvTable {
    /// Load a semicolon-delimited CSV file using Polars.
    pub fn load(file_path: &Path) -> Result<Self, LoaderError> {
        // Lazy scan, then collect; each file is read exactly once.
        let df = LazyCsvReader::new(file_path)
            .with_separator(b';')
            .with_infer_schema_length(Some(10000))
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|source| LoaderError::Csv {
                path: file_path.to_path_buf(),
                source,
            })?;

        Ok(Self { df })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Distinct string values of a column in first-appearance order.
    pub fn distinct_strings(&self, name: &str) -> Result<Vec<String>, LoaderError> {
        let series = self.df.column(name)?;
        let mut values: Vec<String> = Vec::new();
        for i in 0..self.df.height() {
            if let Ok(val) = series.get(i) {
                if val.is_null() {
                    continue;
                }
                let s = val.to_string().trim_matches('"').to_string();
                if !values.contains(&s) {
                    values.push(s);
                }
            }
        }
        Ok(values)
    }
}
