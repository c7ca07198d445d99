//! Stats module - dataset summaries and gender gap tests

mod gap;
mod summary;

pub use gap::{compute_gender_gaps, leading_genders, welch_ttest, GenderGap, SIGNIFICANCE_THRESHOLD};
pub use summary::{
    format_table, percentile, CategorySummary, ColumnSummary, DatasetSummary, CATEGORY_ROWS,
    DESCRIBE_ROWS,
};
