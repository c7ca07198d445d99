//! Analysis module - turns a dataset and a question into a model narrative.

mod prompt;

pub use prompt::{AnalysisType, PromptBuilder, NO_CONTEXT};

use crate::charts::{ChartError, SupportChart};
use crate::config::Settings;
use crate::data::{survey_records, SurveySchema};
use crate::llm::{LlmError, LlmProvider, ProviderChoice};
use crate::stats::{compute_gender_gaps, DatasetSummary, GenderGap};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Default file name offered when saving a narrative.
pub const REPORT_FILE_NAME: &str = "political_analysis.txt";

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Please enter your specific analysis question")]
    EmptyQuestion,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Could not save analysis: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the user chose for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub provider: ProviderChoice,
    pub analysis_type: AnalysisType,
    /// Only used for `AnalysisType::CustomQuery`.
    pub custom_question: String,
    pub context: String,
}

impl AnalysisRequest {
    /// Predefined question, or the trimmed custom one.
    pub fn question(&self) -> Result<String, AnalysisError> {
        match self.analysis_type.question() {
            Some(q) => Ok(q.to_string()),
            None => {
                let q = self.custom_question.trim();
                if q.is_empty() {
                    Err(AnalysisError::EmptyQuestion)
                } else {
                    Ok(q.to_string())
                }
            }
        }
    }
}

/// Result of a successful run.
pub struct AnalysisOutcome {
    pub analysis_type: AnalysisType,
    pub question: String,
    pub narrative: String,
    pub provider: &'static str,
    pub model: String,
    /// Present only for analyses that come with a chart.
    pub chart: Option<Result<SupportChart, ChartError>>,
    pub gender_gaps: Vec<GenderGap>,
}

/// Sends dataset-aware prompts to a provider.
pub struct DataAnalyzer {
    summary: DatasetSummary,
    gender_gaps: Vec<GenderGap>,
    provider: Box<dyn LlmProvider>,
}

impl DataAnalyzer {
    pub fn new(df: &DataFrame, provider: Box<dyn LlmProvider>) -> Self {
        Self::from_summary(DatasetSummary::from_dataframe(df), provider)
    }

    pub fn from_summary(summary: DatasetSummary, provider: Box<dyn LlmProvider>) -> Self {
        Self {
            summary,
            gender_gaps: Vec::new(),
            provider,
        }
    }

    pub fn with_gender_gaps(mut self, gaps: Vec<GenderGap>) -> Self {
        self.gender_gaps = gaps;
        self
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub fn generate_analysis_prompt(&self, question: &str, context: Option<&str>) -> String {
        PromptBuilder::new(&self.summary)
            .with_gender_gaps(&self.gender_gaps)
            .build(question, context)
    }

    pub fn analyze(&self, question: &str, context: Option<&str>) -> Result<String, LlmError> {
        let prompt = self.generate_analysis_prompt(question, context);
        tracing::info!(
            "Requesting analysis from {} ({}), prompt {} chars",
            self.provider.name(),
            self.provider.model(),
            prompt.len()
        );
        self.provider.generate(&prompt)
    }
}

/// Run one analysis end to end. Called from a background thread.
pub fn run_analysis(
    df: &DataFrame,
    request: &AnalysisRequest,
    settings: &Settings,
) -> Result<AnalysisOutcome, AnalysisError> {
    let question = request.question()?;
    let provider = request.provider.clone().into_provider(settings)?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let columns = SurveySchema::detect(&names).ok();

    let gender_gaps = match (&columns, request.analysis_type.has_chart()) {
        (Some(columns), true) => survey_records(df, columns)
            .map(|records| compute_gender_gaps(&records))
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let analyzer = DataAnalyzer::new(df, provider).with_gender_gaps(gender_gaps.clone());
    let narrative = analyzer.analyze(&question, Some(&request.context))?;

    let chart = request
        .analysis_type
        .has_chart()
        .then(|| match &columns {
            Some(columns) => SupportChart::from_columns(df, columns),
            None => SupportChart::from_dataframe(df),
        });

    Ok(AnalysisOutcome {
        analysis_type: request.analysis_type,
        question,
        narrative,
        provider: analyzer.provider().name(),
        model: analyzer.provider().model().to_string(),
        chart,
        gender_gaps,
    })
}

/// Write the narrative as a plain text file.
pub fn save_report(path: &Path, narrative: &str) -> Result<(), AnalysisError> {
    std::fs::write(path, narrative)?;
    tracing::info!("Analysis saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records prompts and answers with a fixed reply.
    struct EchoProvider {
        reply: String,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &'static str {
            "Echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }

        fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn request(analysis_type: AnalysisType, custom: &str) -> AnalysisRequest {
        AnalysisRequest {
            provider: ProviderChoice::Ollama {
                model: "llama2".to_string(),
            },
            analysis_type,
            custom_question: custom.to_string(),
            context: String::new(),
        }
    }

    #[test]
    fn test_custom_question_must_not_be_blank() {
        let err = request(AnalysisType::CustomQuery, "  \n").question().unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyQuestion));
        assert_eq!(
            request(AnalysisType::CustomQuery, " Why? ").question().unwrap(),
            "Why?"
        );
    }

    #[test]
    fn test_predefined_question_ignores_custom_text() {
        let q = request(AnalysisType::DemographicTrends, "ignored").question().unwrap();
        assert_eq!(q, "What are the main demographic trends across all parties?");
    }

    #[test]
    fn test_analyzer_sends_built_prompt() {
        let df = df! {
            "Gender" => ["Male", "Female"],
            "Party" => ["Labour", "Labour"],
            "Support" => [31.5, 38.0],
        }
        .unwrap();
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let provider = EchoProvider {
            reply: "## Result".to_string(),
            prompts: Arc::clone(&prompts),
        };
        let analyzer = DataAnalyzer::new(&df, Box::new(provider));

        let expected = analyzer.generate_analysis_prompt("Who leads?", None);
        let answer = analyzer.analyze("Who leads?", None).unwrap();
        assert_eq!(answer, "## Result");

        let sent = prompts.lock().unwrap();
        assert_eq!(sent.as_slice(), [expected.clone()]);
        assert!(expected.contains("Total Rows: 2"));
        assert!(expected.contains("Question: Who leads?"));
    }

    #[test]
    fn test_save_report_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILE_NAME);
        save_report(&path, "# Findings").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Findings");
    }
}
