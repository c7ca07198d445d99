//! Row-level view of the three required survey columns.

use crate::data::loader::{column_strings, column_values};
use crate::data::SurveyColumns;
use polars::prelude::*;

/// One usable survey row.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    pub gender: String,
    pub party: String,
    pub support: f64,
}

/// Extract rows where gender, party and support are all present.
///
/// Blank categories and non-numeric support values drop the row.
pub fn survey_records(
    df: &DataFrame,
    columns: &SurveyColumns,
) -> Result<Vec<SurveyRecord>, PolarsError> {
    let genders = column_strings(df, &columns.gender)?;
    let parties = column_strings(df, &columns.party)?;
    let support = column_values(df, &columns.support)?;

    Ok(genders
        .into_iter()
        .zip(parties)
        .zip(support)
        .filter_map(|((g, p), s)| match (g, p, s) {
            (Some(gender), Some(party), Some(support))
                if !gender.is_empty() && !party.is_empty() =>
            {
                Some(SurveyRecord {
                    gender,
                    party,
                    support,
                })
            }
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let df = df! {
            "Gender" => [Some("Male"), Some("Female"), None, Some("Female")],
            "Party" => [Some("Labour"), Some("Labour"), Some("Green"), Some("")],
            "Support" => [Some(31.5), None, Some(9.0), Some(4.0)],
        }
        .unwrap();
        let columns = SurveyColumns {
            gender: "Gender".to_string(),
            party: "Party".to_string(),
            support: "Support".to_string(),
            demographics: Vec::new(),
        };

        let records = survey_records(&df, &columns).unwrap();
        assert_eq!(
            records,
            vec![SurveyRecord {
                gender: "Male".to_string(),
                party: "Labour".to_string(),
                support: 31.5,
            }]
        );
    }
}
