//! Survey Insight - political survey CSV analysis with local or hosted LLMs.
//!
//! Loads a survey CSV, checks it for gender, party and support columns,
//! summarises it into a prompt and asks Ollama or Gemini for a narrative.
//! Gender based analyses also get a party support chart.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod llm;
pub mod stats;

pub use analysis::{run_analysis, AnalysisError, AnalysisOutcome, AnalysisRequest, AnalysisType};
pub use config::Settings;
pub use llm::{LlmError, LlmProvider, ProviderChoice};
