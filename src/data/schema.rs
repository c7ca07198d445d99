//! Survey column detection.
//!
//! A survey CSV must carry a gender category, a party category and a numeric
//! support percentage. Headers are matched ignoring case and surrounding
//! whitespace; every other column is treated as an optional demographic field.

use thiserror::Error;

pub const GENDER: &str = "Gender";
pub const PARTY: &str = "Party";
pub const SUPPORT: &str = "Support";

const GENDER_ALIASES: &[&str] = &["gender"];
const PARTY_ALIASES: &[&str] = &["party"];
const SUPPORT_ALIASES: &[&str] = &[
    "support",
    "support_pct",
    "support_percentage",
    "support (%)",
    "percentage",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Resolved header names for one survey dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyColumns {
    pub gender: String,
    pub party: String,
    pub support: String,
    pub demographics: Vec<String>,
}

pub struct SurveySchema;

impl SurveySchema {
    /// Detect the required columns among `columns`.
    ///
    /// All missing required columns are reported together.
    pub fn detect(columns: &[String]) -> Result<SurveyColumns, SchemaError> {
        let gender = Self::find(columns, GENDER_ALIASES);
        let party = Self::find(columns, PARTY_ALIASES);
        let support = Self::find(columns, SUPPORT_ALIASES);

        match (gender, party, support) {
            (Some(gender), Some(party), Some(support)) => {
                let demographics = columns
                    .iter()
                    .filter(|c| **c != gender && **c != party && **c != support)
                    .cloned()
                    .collect();
                Ok(SurveyColumns {
                    gender,
                    party,
                    support,
                    demographics,
                })
            }
            (gender, party, support) => {
                let missing = [(gender, GENDER), (party, PARTY), (support, SUPPORT)]
                    .into_iter()
                    .filter(|(found, _)| found.is_none())
                    .map(|(_, name)| name.to_string())
                    .collect();
                Err(SchemaError::MissingColumns(missing))
            }
        }
    }

    fn find(columns: &[String], aliases: &[&str]) -> Option<String> {
        // Alias order is preference order
        aliases.iter().find_map(|alias| {
            columns
                .iter()
                .find(|c| c.trim().eq_ignore_ascii_case(alias))
                .cloned()
        })
    }
}
