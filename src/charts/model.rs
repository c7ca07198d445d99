//! Chart data model: mean support per (gender, party).

use crate::data::{survey_records, SchemaError, SurveyColumns, SurveyRecord, SurveySchema};
use polars::prelude::*;
use thiserror::Error;

pub const CHART_TITLE: &str = "Party Support by Gender";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No rows with a gender, a party and a numeric support value")]
    NoData,
    #[error("Render error: {0}")]
    Render(String),
}

/// Grouped bar chart data.
///
/// `values[p][g]` is the mean support of `parties[p]` among `genders[g]`,
/// or `None` when the survey has no such row.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportChart {
    pub genders: Vec<String>,
    pub parties: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl SupportChart {
    /// Aggregate records; categories keep first-appearance order.
    pub fn from_records(records: &[SurveyRecord]) -> Result<Self, ChartError> {
        if records.is_empty() {
            return Err(ChartError::NoData);
        }

        let mut genders: Vec<String> = Vec::new();
        let mut parties: Vec<String> = Vec::new();
        for r in records {
            if !genders.contains(&r.gender) {
                genders.push(r.gender.clone());
            }
            if !parties.contains(&r.party) {
                parties.push(r.party.clone());
            }
        }

        // (sum, count) per cell
        let mut sums = vec![vec![(0.0f64, 0usize); genders.len()]; parties.len()];
        for r in records {
            let g = genders.iter().position(|x| *x == r.gender).unwrap_or_default();
            let p = parties.iter().position(|x| *x == r.party).unwrap_or_default();
            sums[p][g].0 += r.support;
            sums[p][g].1 += 1;
        }

        let values = sums
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(sum, n)| (n > 0).then(|| sum / n as f64))
                    .collect()
            })
            .collect();

        Ok(Self {
            genders,
            parties,
            values,
        })
    }

    /// Build the chart straight from a loaded dataset.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, ChartError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = SurveySchema::detect(&names)?;
        Self::from_columns(df, &columns)
    }

    pub fn from_columns(df: &DataFrame, columns: &SurveyColumns) -> Result<Self, ChartError> {
        let records = survey_records(df, columns)?;
        Self::from_records(&records)
    }

    /// Largest bar, used to size the value axis.
    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }

    /// Centre x position of each party's bar within a gender group,
    /// and the bar width. Groups sit at integer x positions.
    pub fn bar_layout(&self, party_index: usize, gender_index: usize) -> (f64, f64) {
        let n = self.parties.len().max(1) as f64;
        let width = 0.8 / n;
        let offset = (party_index as f64 - (n - 1.0) / 2.0) * width;
        (gender_index as f64 + offset, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(gender: &str, party: &str, support: f64) -> SurveyRecord {
        SurveyRecord {
            gender: gender.to_string(),
            party: party.to_string(),
            support,
        }
    }

    #[test]
    fn test_duplicate_cells_are_averaged() {
        let chart = SupportChart::from_records(&[
            rec("Male", "Labour", 30.0),
            rec("Female", "Labour", 38.0),
            rec("Male", "Labour", 34.0),
            rec("Female", "Green", 9.0),
        ])
        .unwrap();

        assert_eq!(chart.genders, vec!["Male", "Female"]);
        assert_eq!(chart.parties, vec!["Labour", "Green"]);
        assert_eq!(chart.values[0], vec![Some(32.0), Some(38.0)]);
        assert_eq!(chart.values[1], vec![None, Some(9.0)]);
        assert_eq!(chart.max_value(), 38.0);
    }

    #[test]
    fn test_empty_records_fail() {
        assert!(matches!(SupportChart::from_records(&[]), Err(ChartError::NoData)));
    }

    #[test]
    fn test_bar_layout_is_centred() {
        let chart = SupportChart {
            genders: vec!["Male".to_string()],
            parties: vec!["A".to_string(), "B".to_string()],
            values: vec![vec![Some(1.0)], vec![Some(2.0)]],
        };
        let (x0, w) = chart.bar_layout(0, 0);
        let (x1, _) = chart.bar_layout(1, 0);
        assert!((w - 0.4).abs() < 1e-12);
        assert!((x0 + 0.2).abs() < 1e-12);
        assert!((x1 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_from_dataframe_requires_columns() {
        let df = df! { "Region" => ["North"], "Support" => [40.0] }.unwrap();
        let err = SupportChart::from_dataframe(&df).unwrap_err();
        assert_eq!(err.to_string(), "Missing required column(s): Gender, Party");
    }

    #[test]
    fn test_from_dataframe_with_text_support() {
        let df = df! {
            "gender" => ["Female", "Male"],
            "party" => ["Labour", "Labour"],
            "Support" => ["41%", "35%"],
        }
        .unwrap();
        let chart = SupportChart::from_dataframe(&df).unwrap();
        assert_eq!(chart.values, vec![vec![Some(41.0), Some(35.0)]]);
    }
}
