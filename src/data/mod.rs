//! Data module - CSV loading and survey column validation

mod loader;
mod records;
mod schema;

pub use loader::{
    column_strings, column_values, is_numeric, numeric_columns, preview_rows, DataLoader,
    LoaderError, NULL_CELL, PREVIEW_ROWS,
};
pub use records::{survey_records, SurveyRecord};
pub use schema::{SchemaError, SurveyColumns, SurveySchema, GENDER, PARTY, SUPPORT};
