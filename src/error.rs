//! Custom error types for the advisory pipeline
//!
//! Provides structured, typed errors instead of generic Box<dyn Error>

use thiserror::Error;

/// Currency pair validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairError {
    #[error("Invalid pair format: {normalized} (from '{input}'). Expected 6 letters (e.g., EURUSD)")]
    InvalidFormat { input: String, normalized: String },

    #[error("Pair {pair} is not a supported major pair. Supported pairs: {supported}")]
    UnsupportedPair { pair: String, supported: String },
}

/// Finance data provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Market data provider unavailable")]
    Unavailable,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Provider error {code}: {description}")]
    Upstream { code: String, description: String },
}

/// LLM request and response errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM API key not configured")]
    MissingCredential,

    #[error("Failed to build LLM client: {0}")]
    Client(String),

    #[error("LLM API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("LLM returned no content")]
    EmptyResponse,

    #[error("LLM reply is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("LLM reply does not match the decision schema: {0}")]
    Schema(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl LlmError {
    /// Short label used when logging why a decision fell back to HOLD
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::MissingCredential => "missing_credential",
            LlmError::Client(_) => "client",
            LlmError::Api(_) => "transport",
            LlmError::EmptyResponse => "empty_response",
            LlmError::MalformedJson(_) => "malformed_json",
            LlmError::Schema(_) => "schema",
        }
    }
}
