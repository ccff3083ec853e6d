//! Static capabilities and constraints for a provider-managed model.

use serde::Deserialize;

use crate::types::common::ProviderType;
use crate::types::temperature::TemperatureConstraint;

fn default_true() -> bool {
    true
}

fn default_provider() -> ProviderType {
    ProviderType::Custom
}

/// Capability metadata for one canonical model name.
///
/// Entries are constructed once at catalogue-build time (static declaration
/// or registry load) and treated as immutable afterwards; the pipeline's
/// finalize hook may return an adjusted copy, never mutate the original.
///
/// The `Deserialize` implementation matches the model-configuration JSON
/// consumed by [`CapabilityModelRegistry`](crate::registry::CapabilityModelRegistry):
/// only `model_name` is mandatory, everything else has the conventional
/// defaults, and `temperature_constraint` is named by kind string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelCapabilities {
    /// Provider that owns this model
    #[serde(default = "default_provider")]
    pub provider: ProviderType,
    /// Canonical model name (the catalogue key)
    pub model_name: String,
    /// Human-readable name for logs and error messages
    #[serde(default)]
    pub friendly_name: String,
    /// Context window size in tokens
    #[serde(default)]
    pub context_window: u64,
    /// Maximum output tokens per request
    #[serde(default)]
    pub max_output_tokens: u64,
    /// Whether the model exposes an extended thinking / reasoning mode
    #[serde(default)]
    pub supports_extended_thinking: bool,
    /// Whether system prompts are honored
    #[serde(default = "default_true")]
    pub supports_system_prompts: bool,
    /// Whether streamed responses are available
    #[serde(default = "default_true")]
    pub supports_streaming: bool,
    /// Whether tool / function calling is available
    #[serde(default)]
    pub supports_function_calling: bool,
    /// Whether image inputs are accepted
    #[serde(default)]
    pub supports_images: bool,
    /// Maximum accepted image size in megabytes (0 when images are unsupported)
    #[serde(default)]
    pub max_image_size_mb: f64,
    /// Whether the sampling temperature parameter is accepted at all
    #[serde(default = "default_true")]
    pub supports_temperature: bool,
    /// Whether a JSON output mode is available
    #[serde(default)]
    pub supports_json_mode: bool,
    /// Maximum thinking-token budget (0 when extended thinking is unsupported)
    #[serde(default)]
    pub max_thinking_tokens: u64,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Alternate names resolving to this model, in declaration order
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Marks models declared through a user-managed registry
    #[serde(default)]
    pub is_custom: bool,
    /// Constraint applied to the sampling temperature
    #[serde(default)]
    pub temperature_constraint: TemperatureConstraint,
}

impl ModelCapabilities {
    /// Create capabilities with the conventional defaults, mirroring what a
    /// minimal registry entry would produce.
    pub fn new(provider: ProviderType, model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        Self {
            provider,
            friendly_name: model_name.clone(),
            model_name,
            context_window: 0,
            max_output_tokens: 0,
            supports_extended_thinking: false,
            supports_system_prompts: true,
            supports_streaming: true,
            supports_function_calling: false,
            supports_images: false,
            max_image_size_mb: 0.0,
            supports_temperature: true,
            supports_json_mode: false,
            max_thinking_tokens: 0,
            description: String::new(),
            aliases: Vec::new(),
            is_custom: false,
            temperature_constraint: TemperatureConstraint::default(),
        }
    }

    /// Set the human-readable name.
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = name.into();
        self
    }

    /// Set the context window size in tokens.
    pub fn with_context_window(mut self, tokens: u64) -> Self {
        self.context_window = tokens;
        self
    }

    /// Set the maximum output tokens per request.
    pub fn with_max_output_tokens(mut self, tokens: u64) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Add an alias for this model.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Replace the alias list.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the temperature constraint.
    pub fn with_temperature_constraint(mut self, constraint: TemperatureConstraint) -> Self {
        self.temperature_constraint = constraint;
        self
    }

    /// Mark the temperature parameter as unsupported.
    pub fn without_temperature(mut self) -> Self {
        self.supports_temperature = false;
        self
    }

    /// Enable extended thinking with the given token budget.
    pub fn with_extended_thinking(mut self, max_thinking_tokens: u64) -> Self {
        self.supports_extended_thinking = true;
        self.max_thinking_tokens = max_thinking_tokens;
        self
    }

    /// Enable function calling.
    pub fn with_function_calling(mut self) -> Self {
        self.supports_function_calling = true;
        self
    }

    /// Enable image inputs with the given size cap.
    pub fn with_images(mut self, max_image_size_mb: f64) -> Self {
        self.supports_images = true;
        self.max_image_size_mb = max_image_size_mb;
        self
    }

    /// Enable JSON output mode.
    pub fn with_json_mode(mut self) -> Self {
        self.supports_json_mode = true;
        self
    }

    /// Mark this entry as declared through a user-managed registry.
    pub fn with_is_custom(mut self, is_custom: bool) -> Self {
        self.is_custom = is_custom;
        self
    }

    /// The temperature that should be sent to the backend.
    ///
    /// Models that do not support temperature return `None` so callers can
    /// omit the parameter entirely. For supported models the constraint
    /// clamps the requested value into a provider-safe one.
    pub fn effective_temperature(&self, requested: f64) -> Option<f64> {
        if !self.supports_temperature {
            return None;
        }
        Some(self.temperature_constraint.corrected_value(requested))
    }

    /// A derived ordering score summarizing relative feature strength.
    ///
    /// Used only for default/preference ordering: larger context windows and
    /// richer feature sets rank higher. The exact weights are an internal
    /// detail; only the ordering they induce is meaningful.
    pub fn effective_capability_rank(&self) -> u32 {
        let mut rank = match self.context_window {
            0 => 0,
            w if w >= 1_000_000 => 40,
            w if w >= 500_000 => 35,
            w if w >= 200_000 => 30,
            w if w >= 128_000 => 25,
            w if w >= 32_000 => 15,
            _ => 5,
        };
        if self.supports_extended_thinking {
            rank += 20;
        }
        if self.supports_function_calling {
            rank += 10;
        }
        if self.supports_images {
            rank += 10;
        }
        if self.supports_json_mode {
            rank += 5;
        }
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_temperature_is_none_when_unsupported() {
        let caps = ModelCapabilities::new(ProviderType::OpenAi, "o3").without_temperature();
        assert_eq!(caps.effective_temperature(0.7), None);
    }

    #[test]
    fn effective_temperature_clamps_instead_of_rejecting() {
        let caps = ModelCapabilities::new(ProviderType::OpenAi, "gpt-5")
            .with_temperature_constraint(TemperatureConstraint::range(0.0, 2.0, Some(0.3)));
        assert_eq!(caps.effective_temperature(5.0), Some(2.0));
        assert_eq!(caps.effective_temperature(0.7), Some(0.7));
    }

    #[test]
    fn rank_prefers_bigger_context_and_richer_features() {
        let small = ModelCapabilities::new(ProviderType::Gemini, "mini").with_context_window(16_000);
        let large = ModelCapabilities::new(ProviderType::Gemini, "pro")
            .with_context_window(1_000_000)
            .with_extended_thinking(32_000)
            .with_function_calling();
        assert!(large.effective_capability_rank() > small.effective_capability_rank());
    }

    #[test]
    fn rank_is_zero_for_unknown_context_and_no_features() {
        let caps = ModelCapabilities::new(ProviderType::Custom, "mystery");
        assert_eq!(caps.effective_capability_rank(), 0);
    }

    #[test]
    fn deserializes_a_minimal_registry_entry() {
        let caps: ModelCapabilities = serde_json::from_str(
            r#"{
                "model_name": "llama3",
                "context_window": 128000,
                "aliases": ["local-llama"],
                "temperature_constraint": "range",
                "is_custom": true
            }"#,
        )
        .unwrap();
        assert_eq!(caps.model_name, "llama3");
        assert_eq!(caps.provider, ProviderType::Custom);
        assert_eq!(caps.aliases, vec!["local-llama"]);
        assert!(caps.supports_system_prompts);
        assert!(caps.supports_streaming);
        assert!(caps.supports_temperature);
        assert!(caps.is_custom);
        assert_eq!(caps.temperature_constraint, TemperatureConstraint::default());
    }
}
