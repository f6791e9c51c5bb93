//! Configuration for the travel agent service.
//!
//! Model selection lives in a YAML file (default `config/config.yaml`);
//! secrets and deployment knobs come from environment variables:
//! - `CONFIG_PATH` - Optional. Path to the YAML config. Defaults to `config/config.yaml`.
//! - `MODEL_PROVIDER` - Optional. `openai` or `groq`. Overrides the YAML value.
//! - `MODEL_NAME` - Optional. Model identifier. Overrides the YAML value.
//! - `OPENAI_API_KEY` - Required when the provider is `openai`.
//! - `GROQ_API_KEY` - Required when the provider is `groq`.
//! - `OPENWEATHERMAP_API_KEY` - Required. Weather lookups.
//! - `GPLACES_API_KEY` - Optional. Google Places, the primary place search source.
//! - `TAVILY_API_KEY` - Optional. Tavily web search, the place search fallback.
//! - `EXCHANGE_RATE_API_KEY` - Required. Currency conversion.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//! - `MAX_ITERATIONS` - Optional. Reasoning cycle ceiling per request. Defaults to `15`.
//! - `PARALLEL_TOOLS` - Optional. Dispatch a batch of tool calls concurrently. Defaults to `false`.
//! - `TOOL_TIMEOUT_SECS` - Optional. Deadline per tool invocation. Defaults to `30`.
//! - `LLM_TIMEOUT_SECS` - Optional. Deadline per reasoning call. Defaults to `120`.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFile {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Reasoning backend. Both speak the OpenAI chat completions protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    OpenAi,
    Groq,
}

impl ModelProvider {
    pub fn base_url(&self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "https://api.openai.com/v1",
            ModelProvider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "openai",
            ModelProvider::Groq => "groq",
        }
    }

    /// Environment variable holding the provider's API key.
    fn key_var(&self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "OPENAI_API_KEY",
            ModelProvider::Groq => "GROQ_API_KEY",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "o4-mini",
            ModelProvider::Groq => "deepseek-r1-distill-llama-70b",
        }
    }

    fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Ok(ModelProvider::OpenAi),
            "groq" => Ok(ModelProvider::Groq),
            other => Err(format!("expected 'openai' or 'groq', got: {}", other)),
        }
    }
}

/// YAML config file shape. Everything is optional; environment variables win
/// over file values.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    llm: LlmSection,
}

#[derive(Debug, Default, Deserialize)]
struct LlmSection {
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    openai: Option<ModelSection>,
    #[serde(default)]
    groq: Option<ModelSection>,
}

#[derive(Debug, Deserialize)]
struct ModelSection {
    model_name: String,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Reasoning backend to use
    pub provider: ModelProvider,

    /// Model identifier at that provider
    pub model_name: String,

    /// API key for the reasoning backend
    pub llm_api_key: String,

    /// OpenWeatherMap API key
    pub weather_api_key: String,

    /// Google Places API key (primary place search source)
    pub google_places_api_key: Option<String>,

    /// Tavily API key (place search fallback)
    pub tavily_api_key: Option<String>,

    /// ExchangeRate-API key
    pub exchange_rate_api_key: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Ceiling on reasoning cycles per request
    pub max_iterations: u32,

    /// Dispatch a batch of tool calls concurrently instead of in order
    pub parallel_tools: bool,

    /// Deadline per tool invocation
    pub tool_timeout: Duration,

    /// Deadline per reasoning call
    pub llm_timeout: Duration,
}

const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

impl Config {
    /// Load configuration from the YAML file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when a required key is absent
    /// and `ConfigError::InvalidValue` when a knob fails to parse.
    pub fn load() -> Result<Self, ConfigError> {
        let (path, path_was_explicit) = match std::env::var("CONFIG_PATH") {
            Ok(path) => (path, true),
            Err(_) => (DEFAULT_CONFIG_PATH.to_string(), false),
        };

        // A missing file at the default path just means defaults; a missing
        // file the operator pointed at is an error.
        let file = if Path::new(&path).exists() {
            load_file(Path::new(&path))?
        } else if path_was_explicit {
            return Err(ConfigError::ReadFile {
                path,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        } else {
            ConfigFile::default()
        };

        let provider = match std::env::var("MODEL_PROVIDER") {
            Ok(value) => ModelProvider::parse(&value)
                .map_err(|e| ConfigError::InvalidValue("MODEL_PROVIDER".to_string(), e))?,
            Err(_) => match &file.llm.provider {
                Some(value) => ModelProvider::parse(value)
                    .map_err(|e| ConfigError::InvalidValue("llm.provider".to_string(), e))?,
                None => ModelProvider::OpenAi,
            },
        };

        let file_model = match provider {
            ModelProvider::OpenAi => file.llm.openai.as_ref(),
            ModelProvider::Groq => file.llm.groq.as_ref(),
        }
        .map(|section| section.model_name.clone());

        let model_name = std::env::var("MODEL_NAME")
            .ok()
            .or(file_model)
            .unwrap_or_else(|| provider.default_model().to_string());

        let llm_api_key = std::env::var(provider.key_var())
            .map_err(|_| ConfigError::MissingEnvVar(provider.key_var().to_string()))?;

        let weather_api_key = std::env::var("OPENWEATHERMAP_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENWEATHERMAP_API_KEY".to_string()))?;

        let exchange_rate_api_key = std::env::var("EXCHANGE_RATE_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("EXCHANGE_RATE_API_KEY".to_string()))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_iterations: u32 = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e)))?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let parallel_tools = std::env::var("PARALLEL_TOOLS")
            .ok()
            .map(|v| {
                parse_bool(&v)
                    .map_err(|e| ConfigError::InvalidValue("PARALLEL_TOOLS".to_string(), e))
            })
            .transpose()?
            .unwrap_or(false);

        let tool_timeout = parse_secs("TOOL_TIMEOUT_SECS", 30)?;
        let llm_timeout = parse_secs("LLM_TIMEOUT_SECS", 120)?;

        Ok(Self {
            provider,
            model_name,
            llm_api_key,
            weather_api_key,
            google_places_api_key: std::env::var("GPLACES_API_KEY").ok(),
            tavily_api_key: std::env::var("TAVILY_API_KEY").ok(),
            exchange_rate_api_key,
            host,
            port,
            max_iterations,
            parallel_tools,
            tool_timeout,
            llm_timeout,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(provider: ModelProvider, model_name: String, llm_api_key: String) -> Self {
        Self {
            provider,
            model_name,
            llm_api_key,
            weather_api_key: String::new(),
            google_places_api_key: None,
            tavily_api_key: None,
            exchange_rate_api_key: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_iterations: 15,
            parallel_tools: false,
            tool_timeout: Duration::from_secs(30),
            llm_timeout: Duration::from_secs(120),
        }
    }
}

fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
        path: path.display().to_string(),
        source,
    })
}

fn parse_secs(var: &str, default: u64) -> Result<Duration, ConfigError> {
    let secs: u64 = std::env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e| ConfigError::InvalidValue(var.to_string(), format!("{}", e)))?;
    Ok(Duration::from_secs(secs))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}
