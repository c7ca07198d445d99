use super::{check_status, send_error, LlmError, LlmProvider};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "Ollama";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for a locally running Ollama server.
pub struct OllamaProvider {
    client: Client,
    url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(client: Client, base_url: &str, model: String) -> Self {
        Self {
            client,
            url: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model,
        }
    }
}

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        tracing::debug!("Posting {} prompt chars to {}", prompt.len(), self.url);

        // Non-streaming: the whole completion arrives in one JSON object
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| send_error(PROVIDER, &self.url, e))?;

        let parsed: GenerateResponse = check_status(PROVIDER, response)?
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("missing `response` field: {}", e)))?;

        Ok(parsed.response)
    }
}
