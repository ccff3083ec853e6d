//! Request/response boundary types for content generation.
//!
//! Transport to actual model backends lives outside this crate; these types
//! define the shape of what crosses that boundary.

use serde::{Deserialize, Serialize};

use crate::types::common::ProviderType;

/// Default sampling temperature used when a request does not specify one.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// A single content-generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// User prompt to send to the model
    pub prompt: String,
    /// Model name or alias to use
    pub model_name: String,
    /// Optional system prompt for model behavior
    pub system_prompt: Option<String>,
    /// Sampling temperature; corrected per model constraint before dispatch
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_output_tokens: Option<u64>,
}

impl GenerationRequest {
    /// Create a request with the default temperature and no system prompt.
    pub fn new(prompt: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_name: model_name.into(),
            system_prompt: None,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: None,
        }
    }

    /// Set the system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token cap.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u64) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// Token accounting reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Generated content plus metadata, as returned by a provider's transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Generated text
    pub content: String,
    /// Canonical name of the model that produced the content
    pub model_name: String,
    /// Human-readable provider/model name for logs
    pub friendly_name: String,
    /// Provider that served the request
    pub provider: ProviderType,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
    /// Provider-specific extras (finish reason, request ids, ...)
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ModelResponse {
    /// Create a response with empty metadata and no usage.
    pub fn new(
        content: impl Into<String>,
        model_name: impl Into<String>,
        provider: ProviderType,
    ) -> Self {
        let model_name = model_name.into();
        Self {
            content: content.into(),
            friendly_name: model_name.clone(),
            model_name,
            provider,
            usage: None,
            metadata: serde_json::Map::new(),
        }
    }
}
