//! Dataset Summary Module
//! Descriptive statistics and text tables describing a survey dataset.

use crate::data::{
    column_strings, column_values, numeric_columns, preview_rows, NULL_CELL, PREVIEW_ROWS,
};
use polars::prelude::*;
use rayon::prelude::*;

/// Row labels of the describe table, in display order.
pub const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Row labels of the describe table for text columns.
pub const CATEGORY_ROWS: [&str; 4] = ["count", "unique", "top", "freq"];

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Compute descriptive statistics for an array of values.
    pub fn from_values(name: &str, values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self {
                name: name.to_string(),
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                p25: f64::NAN,
                p50: f64::NAN,
                p75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        // Sample standard deviation; undefined for a single value
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Self {
            name: name.to_string(),
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: percentile(&sorted, 25.0),
            p50: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Values in `DESCRIBE_ROWS` order.
    pub fn row_values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ]
    }
}

/// Frequency statistics for one text column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first.
    pub top: Option<String>,
    pub freq: usize,
}

impl CategorySummary {
    pub fn from_values(name: &str, values: &[String]) -> Self {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for v in values {
            match counts.iter_mut().find(|(seen, _)| *seen == v.as_str()) {
                Some((_, n)) => *n += 1,
                None => counts.push((v.as_str(), 1)),
            }
        }

        // max_by_key returns the last maximum, so scan in reverse
        let top = counts.iter().rev().max_by_key(|(_, n)| *n);

        Self {
            name: name.to_string(),
            count: values.len(),
            unique: counts.len(),
            top: top.map(|(v, _)| v.to_string()),
            freq: top.map(|(_, n)| *n).unwrap_or(0),
        }
    }

    /// Cells in `CATEGORY_ROWS` order.
    pub fn row_values(&self) -> [String; 4] {
        [
            self.count.to_string(),
            self.unique.to_string(),
            self.top.clone().unwrap_or_else(|| NULL_CELL.to_string()),
            if self.top.is_some() {
                self.freq.to_string()
            } else {
                NULL_CELL.to_string()
            },
        ]
    }
}

/// Calculate percentile using linear interpolation (NumPy compatible).
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}

/// Everything the prompt needs to know about the dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetSummary {
    pub columns: Vec<String>,
    pub row_count: usize,
    pub numeric: Vec<ColumnSummary>,
    /// Text columns, described only when there are no numeric ones.
    pub categorical: Vec<CategorySummary>,
    pub sample: Vec<Vec<String>>,
}

impl DatasetSummary {
    /// Summarise a DataFrame; numeric columns are processed in parallel.
    pub fn from_dataframe(df: &DataFrame) -> Self {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let numeric = numeric_columns(df)
            .par_iter()
            .map(|name| {
                let values: Vec<f64> = column_values(df, name)
                    .unwrap_or_default()
                    .into_iter()
                    .flatten()
                    .collect();
                ColumnSummary::from_values(name, &values)
            })
            .collect();

        let categorical = df
            .get_columns()
            .iter()
            .filter(|col| col.dtype() == &DataType::String)
            .map(|col| {
                let name = col.name().as_str();
                let values: Vec<String> = column_strings(df, name)
                    .unwrap_or_default()
                    .into_iter()
                    .flatten()
                    .collect();
                CategorySummary::from_values(name, &values)
            })
            .collect();

        Self {
            columns,
            row_count: df.height(),
            numeric,
            categorical,
            sample: preview_rows(df, PREVIEW_ROWS),
        }
    }

    /// Statistics laid out like a pandas `describe()` printout.
    ///
    /// Like pandas, text columns are described only when no numeric
    /// column exists.
    pub fn describe_table(&self) -> String {
        if self.numeric.is_empty() {
            return self.category_table();
        }

        let mut header = vec![String::new()];
        header.extend(self.numeric.iter().map(|c| c.name.clone()));

        let rows: Vec<Vec<String>> = DESCRIBE_ROWS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut row = vec![label.to_string()];
                row.extend(self.numeric.iter().map(|c| format_stat(c.row_values()[i])));
                row
            })
            .collect();

        format_table(&header, &rows)
    }

    fn category_table(&self) -> String {
        if self.categorical.is_empty() {
            return "No numeric columns".to_string();
        }

        let mut header = vec![String::new()];
        header.extend(self.categorical.iter().map(|c| c.name.clone()));

        let cells: Vec<[String; 4]> = self.categorical.iter().map(|c| c.row_values()).collect();
        let rows: Vec<Vec<String>> = CATEGORY_ROWS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut row = vec![label.to_string()];
                row.extend(cells.iter().map(|c| c[i].clone()));
                row
            })
            .collect();

        format_table(&header, &rows)
    }

    /// The first rows of the dataset with a positional index.
    pub fn sample_table(&self) -> String {
        let mut header = vec![String::new()];
        header.extend(self.columns.iter().cloned());

        let rows: Vec<Vec<String>> = self
            .sample
            .iter()
            .enumerate()
            .map(|(i, cells)| {
                let mut row = vec![i.to_string()];
                row.extend(cells.iter().cloned());
                row
            })
            .collect();

        format_table(&header, &rows)
    }
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        NULL_CELL.to_string()
    } else {
        format!("{:.6}", v)
    }
}

/// Right-aligned text table; the first column is left-aligned.
pub fn format_table(header: &[String], rows: &[Vec<String>]) -> String {
    let n_cols = header.len();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(n_cols) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .take(n_cols)
            .map(|(i, cell)| {
                if i == 0 {
                    format!("{:<width$}", cell, width = widths[i])
                } else {
                    format!("{:>width$}", cell, width = widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    std::iter::once(render(header))
        .chain(rows.iter().map(|r| render(r)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_summary_matches_describe() {
        let s = ColumnSummary::from_values("Support", &[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(s.count, 4);
        assert!((s.mean - 25.0).abs() < 1e-12);
        assert!((s.std - 12.909944487358056).abs() < 1e-9);
        assert_eq!(s.min, 10.0);
        assert!((s.p25 - 17.5).abs() < 1e-12);
        assert!((s.p50 - 25.0).abs() < 1e-12);
        assert!((s.p75 - 32.5).abs() < 1e-12);
        assert_eq!(s.max, 40.0);
    }

    #[test]
    fn test_single_value_has_undefined_std() {
        let s = ColumnSummary::from_values("x", &[5.0]);
        assert_eq!(s.count, 1);
        assert!(s.std.is_nan());
        assert_eq!(s.p75, 5.0);
    }

    #[test]
    fn test_summary_from_dataframe() {
        let df = df! {
            "Gender" => ["Male", "Female", "Male"],
            "Support" => [30.0, 40.0, 50.0],
            "Year" => [2019i64, 2019, 2024],
        }
        .unwrap();

        let summary = DatasetSummary::from_dataframe(&df);
        assert_eq!(summary.columns, vec!["Gender", "Support", "Year"]);
        assert_eq!(summary.row_count, 3);
        let names: Vec<&str> = summary.numeric.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Support", "Year"]);
        assert_eq!(summary.sample.len(), 3);
    }

    #[test]
    fn test_describe_table_layout() {
        let summary = DatasetSummary {
            columns: vec!["Support".to_string()],
            row_count: 2,
            numeric: vec![ColumnSummary::from_values("Support", &[1.0, 3.0])],
            categorical: Vec::new(),
            sample: Vec::new(),
        };
        let table = summary.describe_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].ends_with("Support"));
        assert_eq!(lines[1], "count  2.000000");
        assert_eq!(lines[2], "mean   2.000000");
        assert!(lines[8].starts_with("max"));
    }

    #[test]
    fn test_describe_without_numeric_columns() {
        let summary = DatasetSummary::default();
        assert_eq!(summary.describe_table(), "No numeric columns");
    }

    #[test]
    fn test_text_only_dataset_is_described_by_frequency() {
        let df = df! {
            "Gender" => ["Male", "Female", "Female"],
            "Party" => ["Labour", "Reform", "Labour"],
        }
        .unwrap();

        let summary = DatasetSummary::from_dataframe(&df);
        assert!(summary.numeric.is_empty());
        assert_eq!(
            summary.categorical[0],
            CategorySummary {
                name: "Gender".to_string(),
                count: 3,
                unique: 2,
                top: Some("Female".to_string()),
                freq: 2,
            }
        );

        let table = summary.describe_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "        Gender   Party");
        assert_eq!(lines[1], "count        3       3");
        assert_eq!(lines[2], "unique       2       2");
        assert_eq!(lines[3], "top     Female  Labour");
        assert_eq!(lines[4], "freq         2       2");
    }

    #[test]
    fn test_category_ties_keep_first_seen() {
        let values: Vec<String> = ["Reform", "Labour"].iter().map(|s| s.to_string()).collect();
        let s = CategorySummary::from_values("Party", &values);
        assert_eq!(s.top.as_deref(), Some("Reform"));
        assert_eq!(s.freq, 1);
    }

    #[test]
    fn test_numeric_columns_take_precedence_over_text() {
        let df = df! {
            "Gender" => ["Male", "Female"],
            "Support" => [30.0, 40.0],
        }
        .unwrap();
        let table = DatasetSummary::from_dataframe(&df).describe_table();
        assert!(table.lines().nth(1).unwrap().starts_with("count"));
        assert!(!table.contains("unique"));
    }

    #[test]
    fn test_sample_table_has_index() {
        let summary = DatasetSummary {
            columns: vec!["Gender".to_string(), "Support".to_string()],
            row_count: 1,
            numeric: Vec::new(),
            categorical: Vec::new(),
            sample: vec![vec!["Female".to_string(), "38.0".to_string()]],
        };
        assert_eq!(summary.sample_table(), "   Gender  Support\n0  Female     38.0");
    }
}
