//! Language model providers.
//!
//! Both backends are plain HTTP services. Requests are blocking and are only
//! ever issued from a background thread so the UI keeps painting.

mod gemini;
mod ollama;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::Settings;
use reqwest::blocking::Client;
use std::time::Duration;
use thiserror::Error;

/// Longest slice of an error body kept in an error message.
const ERROR_BODY_LIMIT: usize = 300;

/// Errors that can occur when talking to a model provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Could not connect to {provider} at {url}: {source}")]
    Connection {
        provider: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Please enter your Gemini API key")]
    MissingApiKey,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Troubleshooting hint shown under the error, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            LlmError::Connection { provider: "Ollama", .. } => {
                Some("Make sure the Ollama service is running locally (`ollama serve`).")
            }
            LlmError::Status { status: 404, provider: "Ollama", .. } => {
                Some("The selected model may not be pulled yet (`ollama pull <model>`).")
            }
            LlmError::Status { status: 400 | 401 | 403, provider: "Gemini", .. }
            | LlmError::MissingApiKey => Some("Check the Gemini API key in the sidebar."),
            _ => None,
        }
    }
}

/// A backend that turns a prompt into narrative text.
pub trait LlmProvider: Send + Sync {
    /// Display name used in status messages and logs.
    fn name(&self) -> &'static str;

    /// Model identifier sent to the backend.
    fn model(&self) -> &str;

    /// Send `prompt` and return the generated text.
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Provider selected in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChoice {
    Ollama { model: String },
    Gemini { api_key: String },
}

impl ProviderChoice {
    /// Build the provider for this choice.
    ///
    /// A blank Gemini key fails here, before any request is made.
    pub fn into_provider(self, settings: &Settings) -> Result<Box<dyn LlmProvider>, LlmError> {
        let client = http_client(settings)?;
        match self {
            ProviderChoice::Ollama { model } => Ok(Box::new(OllamaProvider::new(
                client,
                &settings.ollama.base_url,
                model,
            ))),
            ProviderChoice::Gemini { api_key } => {
                let api_key = api_key.trim();
                if api_key.is_empty() {
                    return Err(LlmError::MissingApiKey);
                }
                Ok(Box::new(GeminiProvider::new(
                    client,
                    &settings.gemini.base_url,
                    settings.gemini.model.clone(),
                    api_key.to_string(),
                )))
            }
        }
    }
}

/// Shared blocking client with the configured timeout.
pub fn http_client(settings: &Settings) -> Result<Client, LlmError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(settings.http.timeout_secs))
        .build()?)
}

/// Map a send failure: connect errors get the endpoint attached.
fn send_error(provider: &'static str, url: &str, err: reqwest::Error) -> LlmError {
    if err.is_connect() {
        LlmError::Connection {
            provider,
            url: url.to_string(),
            source: err,
        }
    } else {
        LlmError::Request(err)
    }
}

/// Turn a non-success response into `LlmError::Status`.
fn check_status(
    provider: &'static str,
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(LlmError::Status {
        provider,
        status: status.as_u16(),
        body: truncate(body.trim(), ERROR_BODY_LIMIT),
    })
}

fn truncate(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_gemini_key_rejected_without_request() {
        let choice = ProviderChoice::Gemini {
            api_key: "  ".to_string(),
        };
        let err = choice.into_provider(&Settings::default()).err().unwrap();
        assert!(matches!(err, LlmError::MissingApiKey));
        assert_eq!(err.hint(), Some("Check the Gemini API key in the sidebar."));
    }

    #[test]
    fn test_ollama_choice_uses_selected_model() {
        let choice = ProviderChoice::Ollama {
            model: "codellama".to_string(),
        };
        let provider = choice.into_provider(&Settings::default()).unwrap();
        assert_eq!(provider.name(), "Ollama");
        assert_eq!(provider.model(), "codellama");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("äöüß", 2), "äö...");
    }
}
