use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ollama: OllamaSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaSettings {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    #[serde(default = "default_ollama_models")]
    pub models: Vec<String>,
    #[serde(default = "default_ollama_model")]
    pub default_model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            models: default_ollama_models(),
            default_model: default_ollama_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Pre-fills the session key; never written back anywhere.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: default_gemini_url(),
            model: default_gemini_model(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_ollama_url() -> String { "http://localhost:11434".to_string() }
fn default_ollama_model() -> String { "llama2".to_string() }
fn default_ollama_models() -> Vec<String> {
    vec![
        "llama2".to_string(),
        "llama3.2:latest".to_string(),
        "codellama".to_string(),
    ]
}
fn default_gemini_url() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_gemini_model() -> String { "gemini-2.0-flash".to_string() }
fn default_timeout_secs() -> u64 { 300 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Later sources override earlier ones:
    /// 1. Default values in the structs
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SURVEY_)
    /// 5. GEMINI_API_KEY, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SURVEY__OLLAMA__BASE_URL -> ollama.base_url
            .add_source(env_source())
            .build()?;

        with_api_key_from_env(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        with_api_key_from_env(settings)?.try_deserialize()
    }

    /// Session API key to pre-fill, ignoring blank values.
    pub fn initial_gemini_key(&self) -> String {
        self.gemini
            .api_key
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("SURVEY")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("ollama.models")
        .try_parsing(true)
}

/// The conventional GEMINI_API_KEY variable wins over everything else.
fn with_api_key_from_env(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("gemini.api_key", key)?
            .build(),
        _ => Ok(settings),
    }
}
