//! Prompt construction for survey analysis requests.

use crate::stats::{DatasetSummary, GenderGap};
use std::fmt::Write;

/// Substituted when the user leaves the context box empty.
pub const NO_CONTEXT: &str = "No additional context provided";

/// Kind of analysis the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisType {
    #[default]
    GenderBased,
    HistoricalComparison,
    DemographicTrends,
    CustomQuery,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 4] = [
        AnalysisType::GenderBased,
        AnalysisType::HistoricalComparison,
        AnalysisType::DemographicTrends,
        AnalysisType::CustomQuery,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnalysisType::GenderBased => "Gender-based Analysis",
            AnalysisType::HistoricalComparison => "Historical Comparison",
            AnalysisType::DemographicTrends => "Demographic Trends",
            AnalysisType::CustomQuery => "Custom Query",
        }
    }

    /// Predefined question; `None` for custom queries.
    pub fn question(self) -> Option<&'static str> {
        match self {
            AnalysisType::GenderBased => {
                Some("What are the key differences in political party support between genders?")
            }
            AnalysisType::HistoricalComparison => {
                Some("How has party support changed compared to the 2019 modeled data?")
            }
            AnalysisType::DemographicTrends => {
                Some("What are the main demographic trends across all parties?")
            }
            AnalysisType::CustomQuery => None,
        }
    }

    /// Whether results for this analysis come with the support chart.
    pub fn has_chart(self) -> bool {
        self == AnalysisType::GenderBased
    }
}

/// Builds the analyst prompt from a dataset summary.
pub struct PromptBuilder<'a> {
    summary: &'a DatasetSummary,
    gender_gaps: &'a [GenderGap],
}

impl<'a> PromptBuilder<'a> {
    pub fn new(summary: &'a DatasetSummary) -> Self {
        Self {
            summary,
            gender_gaps: &[],
        }
    }

    /// Include a gender gap section after the sample data.
    pub fn with_gender_gaps(mut self, gaps: &'a [GenderGap]) -> Self {
        self.gender_gaps = gaps;
        self
    }

    /// Dataset description block embedded in the prompt.
    pub fn dataset_info(&self) -> String {
        let mut info = String::from("Dataset Summary:\n");
        let _ = writeln!(info, "Columns: {}", self.summary.columns.join(", "));
        let _ = writeln!(info, "Total Rows: {}\n", self.summary.row_count);

        info.push_str("Statistical Summary:\n");
        info.push_str(&self.summary.describe_table());

        info.push_str("\n\nSample Data:\n");
        info.push_str(&self.summary.sample_table());

        if !self.gender_gaps.is_empty() {
            info.push_str("\n\nGender Gap by Party (mean support):\n");
            for gap in self.gender_gaps {
                let _ = writeln!(info, "- {}", gap);
            }
            // Keep the block shape identical with and without gaps
            info.truncate(info.trim_end().len());
        }

        info
    }

    /// Full prompt text. A blank `context` becomes `NO_CONTEXT`.
    pub fn build(&self, question: &str, context: Option<&str>) -> String {
        let context = context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(NO_CONTEXT);

        format!(
            "You are a data analyst examining political survey data. Here's the context:

{}

Additional Context: {}

Question: {}

Please provide a detailed analysis that includes:
1. Direct answers to the specific question
2. Relevant statistical insights
3. Notable patterns or trends
4. Important demographic variations
5. Historical comparisons where applicable

Format your response in a clear, structured manner using markdown formatting.",
            self.dataset_info(),
            context,
            question.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ColumnSummary;

    fn summary() -> DatasetSummary {
        DatasetSummary {
            columns: vec!["Gender".to_string(), "Party".to_string(), "Support".to_string()],
            row_count: 2,
            numeric: vec![ColumnSummary::from_values("Support", &[31.5, 38.0])],
            categorical: Vec::new(),
            sample: vec![
                vec!["Male".to_string(), "Labour".to_string(), "31.5".to_string()],
                vec!["Female".to_string(), "Labour".to_string(), "38.0".to_string()],
            ],
        }
    }

    #[test]
    fn test_predefined_questions() {
        assert_eq!(
            AnalysisType::HistoricalComparison.question(),
            Some("How has party support changed compared to the 2019 modeled data?")
        );
        assert_eq!(AnalysisType::CustomQuery.question(), None);
        assert!(AnalysisType::GenderBased.has_chart());
        assert!(!AnalysisType::DemographicTrends.has_chart());
    }

    #[test]
    fn test_prompt_contains_dataset_and_question() {
        let summary = summary();
        let prompt = PromptBuilder::new(&summary).build("Who leads?", Some("UK 2024 poll"));

        assert!(prompt.starts_with(
            "You are a data analyst examining political survey data. Here's the context:\n\nDataset Summary:\n"
        ));
        assert!(prompt.contains("Columns: Gender, Party, Support\n"));
        assert!(prompt.contains("Total Rows: 2\n\nStatistical Summary:\n"));
        assert!(prompt.contains("mean   34.750000"));
        assert!(prompt.contains("\n\nSample Data:\n"));
        assert!(prompt.contains("1  Female  Labour     38.0"));
        assert!(prompt.contains("\n\nAdditional Context: UK 2024 poll\n\nQuestion: Who leads?\n\n"));
        assert!(prompt.contains("5. Historical comparisons where applicable\n"));
        assert!(prompt.ends_with("using markdown formatting."));
    }

    #[test]
    fn test_blank_context_uses_placeholder() {
        let summary = summary();
        let prompt = PromptBuilder::new(&summary).build("Q", Some("   "));
        assert!(prompt.contains("Additional Context: No additional context provided"));
        let prompt = PromptBuilder::new(&summary).build("Q", None);
        assert!(prompt.contains("Additional Context: No additional context provided"));
    }

    #[test]
    fn test_gender_gap_section() {
        let summary = summary();
        let gaps = vec![GenderGap {
            party: "Labour".to_string(),
            first_gender: "Male".to_string(),
            second_gender: "Female".to_string(),
            first_mean: 31.5,
            second_mean: 38.0,
            gap: -6.5,
            p_value: None,
            is_significant: false,
        }];
        let info = PromptBuilder::new(&summary).with_gender_gaps(&gaps).dataset_info();
        assert!(info.ends_with(
            "Gender Gap by Party (mean support):\n- Labour: Male 31.50 vs Female 38.00 (gap -6.50)"
        ));
    }
}
