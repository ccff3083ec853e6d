//! Error handling for the capability-resolution core.
//!
//! All failures surfaced by the resolution pipeline are local validation
//! errors; nothing here is retryable. Retry policy, if any, belongs to the
//! transport layer that sits outside this crate.

use thiserror::Error;

use crate::types::ProviderType;

/// Errors produced by capability resolution, parameter validation, and the
/// dynamic model registry.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The resolved model name has no catalogue entry.
    #[error("model '{model}' is not supported by provider '{provider}'")]
    UnsupportedModel {
        /// Provider that was asked for the model
        provider: ProviderType,
        /// The originally requested model name (possibly an alias)
        model: String,
    },

    /// The model exists but is denied by the restriction policy.
    ///
    /// The message intentionally carries nothing beyond the allow/deny
    /// outcome; policy internals stay opaque.
    #[error("model '{model}' is not allowed by the restriction policy for provider '{provider}'")]
    RestrictedModel {
        /// Provider the restriction applies to
        provider: ProviderType,
        /// The originally requested model name
        model: String,
    },

    /// A request parameter failed its per-model constraint. The message
    /// includes the constraint's description so the caller can self-correct.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model registry configuration problem (bad file contents, duplicate
    /// names or aliases).
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(String),

    /// I/O error while reading a registry configuration file
    #[error("I/O error: {0}")]
    Io(String),

    /// Generation was requested but no transport is wired up, or the
    /// transport itself failed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ProviderError>;

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_model_message_names_provider_and_model() {
        let err = ProviderError::UnsupportedModel {
            provider: ProviderType::OpenAi,
            model: "gpt-4".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("gpt-4"));
        assert!(message.contains("openai"));
    }

    #[test]
    fn restricted_model_message_does_not_leak_policy_detail() {
        let err = ProviderError::RestrictedModel {
            provider: ProviderType::Custom,
            model: "llama3".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("llama3"));
        assert!(message.contains("not allowed"));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ProviderError = json_err.into();
        assert!(matches!(err, ProviderError::Json(_)));
    }
}
