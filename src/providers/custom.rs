//! Provider for self-hosted or local OpenAI-compatible endpoints.
//!
//! Model metadata comes from a user-managed configuration file via
//! [`CapabilityModelRegistry`] instead of a static declaration, so local
//! deployments (Ollama, vLLM, LM Studio, bespoke gateways) share the same
//! capability pipeline as first-party backends.

use std::sync::Arc;

use crate::catalog::ModelCatalog;
use crate::error::{ProviderError, Result};
use crate::provider::{ModelProvider, RankedCapabilityCache};
use crate::providers::ChatTransport;
use crate::registry::CapabilityModelRegistry;
use crate::restriction::RestrictionPolicy;
use crate::types::{GenerationRequest, ModelCapabilities, ModelResponse, ProviderType};

/// Registry-backed provider for locally defined models.
///
/// Only registry entries marked `is_custom` belong to this provider; other
/// entries in a shared configuration file are ignored here. Local model
/// names may carry version tags (`llama3:latest`), which resolution strips
/// when the tagged name itself is not registered.
pub struct CustomProvider {
    registry: CapabilityModelRegistry,
    restrictions: Option<Arc<dyn RestrictionPolicy>>,
    transport: Option<Arc<dyn ChatTransport>>,
    cache: RankedCapabilityCache,
}

impl CustomProvider {
    /// Create a provider around a loaded registry.
    pub fn new(registry: CapabilityModelRegistry) -> Self {
        let models = registry.list_models().len();
        let aliases = registry.list_aliases().len();
        tracing::info!("custom provider loaded {models} models with {aliases} aliases");
        Self {
            registry,
            restrictions: None,
            transport: None,
            cache: RankedCapabilityCache::new(),
        }
    }

    /// Inject a restriction policy.
    pub fn with_restriction_policy(mut self, policy: Arc<dyn RestrictionPolicy>) -> Self {
        self.restrictions = Some(policy);
        self
    }

    /// Inject the transport used by `generate_content`.
    pub fn with_transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Re-read the registry's configuration file and drop the ranked cache.
    ///
    /// The cache never expires on its own; every catalogue mutation must go
    /// through here (or call `invalidate_capability_cache` itself).
    pub fn reload_registry(&mut self) -> Result<()> {
        self.registry.reload()?;
        self.cache.invalidate();
        Ok(())
    }

    fn custom_entry(&self, name: &str) -> Option<ModelCapabilities> {
        self.registry
            .resolve(name)
            .filter(|capabilities| capabilities.is_custom)
    }
}

impl ModelProvider for CustomProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Custom
    }

    fn model_configurations(&self) -> ModelCatalog {
        self.registry
            .catalog()
            .iter()
            .filter(|(_, capabilities)| capabilities.is_custom)
            .map(|(_, capabilities)| capabilities.clone())
            .collect()
    }

    fn capability_cache(&self) -> &RankedCapabilityCache {
        &self.cache
    }

    fn restriction_policy(&self) -> Option<&dyn RestrictionPolicy> {
        self.restrictions.as_deref()
    }

    fn resolve_model_name(&self, model_name: &str) -> String {
        if let Some(capabilities) = self.custom_entry(model_name) {
            if capabilities.model_name != model_name {
                tracing::debug!(
                    "resolved model alias '{model_name}' to '{}'",
                    capabilities.model_name
                );
            }
            return capabilities.model_name;
        }

        // Local deployments often tag versions (model:latest); retry with
        // the tag stripped before giving up.
        if let Some((base_name, _)) = model_name.split_once(':') {
            tracing::debug!("stripped version tag from '{model_name}' -> '{base_name}'");
            if let Some(capabilities) = self.custom_entry(base_name) {
                return capabilities.model_name;
            }
            return base_name.to_string();
        }

        tracing::debug!("model '{model_name}' not found in registry, using as-is");
        model_name.to_string()
    }

    fn lookup_capabilities(
        &self,
        canonical_name: &str,
        _requested_name: &str,
    ) -> Option<ModelCapabilities> {
        let entry = self.custom_entry(canonical_name);
        if entry.is_none() {
            tracing::debug!(
                "custom provider cannot resolve model '{canonical_name}'; declare it with \
                 'is_custom': true in the model configuration file"
            );
        }
        entry
    }

    fn finalize_capabilities(
        &self,
        mut capabilities: ModelCapabilities,
        _requested_name: &str,
    ) -> ModelCapabilities {
        capabilities.provider = ProviderType::Custom;
        capabilities
    }

    fn model_registry(&self) -> Option<&CapabilityModelRegistry> {
        Some(&self.registry)
    }

    fn generate_content(&self, request: GenerationRequest) -> Result<ModelResponse> {
        let transport = self.transport.as_ref().ok_or_else(|| {
            ProviderError::Transport("custom provider has no transport configured".to_string())
        })?;

        let capabilities = self.capabilities(&request.model_name)?;

        let mut request = request;
        request.model_name = capabilities.model_name.clone();
        if let Some(corrected) = capabilities.effective_temperature(request.temperature) {
            request.temperature = corrected;
        }

        transport.complete(&request, &capabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ListModelsOptions;
    use std::io::Write;
    use std::path::PathBuf;

    const CONFIG: &str = r#"{
        "models": [
            {
                "model_name": "llama3",
                "context_window": 128000,
                "aliases": ["local-llama"],
                "is_custom": true
            },
            {
                "model_name": "gpt-5",
                "context_window": 400000,
                "aliases": ["fast"],
                "is_custom": false
            }
        ]
    }"#;

    fn registry_with(contents: &str) -> (tempfile::NamedTempFile, CapabilityModelRegistry) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let registry = CapabilityModelRegistry::new(
            ProviderType::Custom,
            "Custom ({model})",
            Some(file.path().to_path_buf()),
        )
        .unwrap();
        (file, registry)
    }

    fn provider() -> (tempfile::NamedTempFile, CustomProvider) {
        let (file, registry) = registry_with(CONFIG);
        (file, CustomProvider::new(registry))
    }

    #[test]
    fn only_custom_entries_are_exposed() {
        let (_file, provider) = provider();
        assert_eq!(
            provider.list_models(&ListModelsOptions::default()),
            vec!["llama3", "local-llama"]
        );
        assert!(provider.capabilities("llama3").is_ok());
        assert!(matches!(
            provider.capabilities("gpt-5"),
            Err(ProviderError::UnsupportedModel { .. })
        ));
    }

    #[test]
    fn capabilities_carry_the_custom_provider_identity() {
        let (_file, provider) = provider();
        let capabilities = provider.capabilities("LOCAL-LLAMA").unwrap();
        assert_eq!(capabilities.model_name, "llama3");
        assert_eq!(capabilities.provider, ProviderType::Custom);
    }

    #[test]
    fn version_tags_are_stripped_when_unregistered() {
        let (_file, provider) = provider();
        assert_eq!(provider.resolve_model_name("llama3:latest"), "llama3");
        assert_eq!(provider.resolve_model_name("mistral:7b"), "mistral");
        assert_eq!(provider.resolve_model_name("unknown"), "unknown");
    }

    #[test]
    fn model_registry_hook_is_wired() {
        let (_file, provider) = provider();
        let registry = provider.model_registry().unwrap();
        assert_eq!(registry.list_models(), vec!["llama3", "gpt-5"]);
    }

    #[test]
    fn reload_invalidates_the_ranked_cache() {
        let (file, mut provider) = provider();

        let before = provider.capabilities_by_rank();
        assert_eq!(before.len(), 1);

        let rewritten = r#"{
            "models": [
                {"model_name": "llama3", "is_custom": true},
                {"model_name": "mistral", "is_custom": true}
            ]
        }"#;
        std::fs::write(file.path(), rewritten).unwrap();
        provider.reload_registry().unwrap();

        let after = provider.capabilities_by_rank();
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn missing_config_behaves_as_an_empty_catalogue() {
        let registry = CapabilityModelRegistry::new(
            ProviderType::Custom,
            "Custom ({model})",
            Some(PathBuf::from("/nonexistent/custom_models.json")),
        )
        .unwrap();
        let provider = CustomProvider::new(registry);
        assert!(provider.list_models(&ListModelsOptions::default()).is_empty());
        assert!(!provider.validate_model_name("anything"));
    }
}
