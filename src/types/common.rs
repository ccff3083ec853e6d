//! Common enums shared across the library.

use serde::{Deserialize, Serialize};

/// Provider identity.
///
/// Restriction policies and error messages key off this value, so the
/// `Display` form is part of the public contract and should remain stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderType {
    OpenAi,
    Anthropic,
    Gemini,
    OpenRouter,
    /// Self-hosted or local OpenAI-compatible endpoints
    Custom,
    /// Any provider this crate has no dedicated variant for
    Other(String),
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Gemini => write!(f, "gemini"),
            Self::OpenRouter => write!(f, "openrouter"),
            Self::Custom => write!(f, "custom"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

impl ProviderType {
    /// Construct a `ProviderType` from a provider name string.
    /// Known names map to concrete variants; others map to `Other(name)`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "openai" => Self::OpenAi,
            "anthropic" => Self::Anthropic,
            "gemini" => Self::Gemini,
            "openrouter" => Self::OpenRouter,
            "custom" => Self::Custom,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ProviderType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ProviderType> for String {
    fn from(provider: ProviderType) -> Self {
        provider.to_string()
    }
}

/// Tool category passed through to provider preference lookup.
///
/// The core places no constraints on these values beyond identity
/// comparison; providers may nominate a default model per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolModelCategory {
    /// Tasks needing deep multi-step reasoning
    ExtendedReasoning,
    /// Latency-sensitive tasks
    FastResponse,
    /// Everything else
    Balanced,
}
