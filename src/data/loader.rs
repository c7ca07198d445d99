//! CSV Data Loader Module
//! Handles survey CSV loading and column extraction using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows shown in the dataset preview and the prompt sample.
pub const PREVIEW_ROWS: usize = 5;

/// Placeholder for missing cells, matching what analysts expect from pandas.
pub const NULL_CELL: &str = "NaN";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
    #[error("CSV file has no columns")]
    EmptyDataset,
}

/// Holds the survey dataset for the current session.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Read a CSV file into a DataFrame without touching loader state.
    ///
    /// Cells that fail to parse as the inferred type become null.
    pub fn read_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        if df.width() == 0 {
            return Err(LoaderError::EmptyDataset);
        }

        tracing::debug!(
            "Read {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );
        Ok(df)
    }

    /// Load a CSV file and keep it as the current dataset.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let df = Self::read_csv(file_path)?;
        self.file_path = Some(file_path.to_path_buf());
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// First `n` rows rendered as strings, one inner vec per row.
    pub fn preview_rows(&self, n: usize) -> Vec<Vec<String>> {
        self.df
            .as_ref()
            .map(|df| preview_rows(df, n))
            .unwrap_or_default()
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Path of the loaded file.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// File name of the loaded file for status messages.
    pub fn file_name(&self) -> Option<String> {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: PathBuf) {
        self.df = Some(df);
        self.file_path = Some(file_path);
    }
}

pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Names of the numeric columns, in file order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// A column as optional strings. Values that cannot be cast are None.
pub fn column_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, PolarsError> {
    let cast = df.column(name)?.cast(&DataType::String)?;
    let ca = cast.as_materialized_series().str()?;
    Ok(ca
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

/// A column as optional floats; NaN is folded into None.
///
/// Text columns are parsed cell by cell so values like `"41.5%"` survive.
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, PolarsError> {
    let column = df.column(name)?;
    if column.dtype() == &DataType::String {
        return Ok(column_strings(df, name)?
            .into_iter()
            .map(|v| {
                v.and_then(|s| s.trim_end_matches('%').trim().parse::<f64>().ok())
                    .filter(|x| !x.is_nan())
            })
            .collect());
    }

    let cast = column.cast(&DataType::Float64)?;
    let ca = cast.as_materialized_series().f64()?;
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// First `n` rows of `df` rendered as strings.
pub fn preview_rows(df: &DataFrame, n: usize) -> Vec<Vec<String>> {
    let head = df.head(Some(n));
    let columns: Vec<Vec<Option<String>>> = head
        .get_column_names()
        .iter()
        .map(|name| column_strings(&head, name.as_str()).unwrap_or_default())
        .collect();

    (0..head.height())
        .map(|row| {
            columns
                .iter()
                .map(|col| {
                    col.get(row)
                        .cloned()
                        .flatten()
                        .unwrap_or_else(|| NULL_CELL.to_string())
                })
                .collect()
        })
        .collect()
}
