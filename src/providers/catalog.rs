//! Provider with a statically declared capability catalogue.

use std::sync::Arc;

use crate::catalog::ModelCatalog;
use crate::error::{ProviderError, Result};
use crate::provider::{ModelProvider, RankedCapabilityCache};
use crate::providers::ChatTransport;
use crate::restriction::RestrictionPolicy;
use crate::types::{
    GenerationRequest, ModelCapabilities, ModelResponse, ProviderType, ToolModelCategory,
};

/// A provider whose catalogue is fixed at construction.
///
/// The common case for first-party backends: capability metadata is declared
/// up front and never changes, so the ranked cache needs no invalidation for
/// the lifetime of the instance. Build one with [`CatalogProvider::builder`].
pub struct CatalogProvider {
    provider: ProviderType,
    catalog: ModelCatalog,
    restrictions: Option<Arc<dyn RestrictionPolicy>>,
    transport: Option<Arc<dyn ChatTransport>>,
    preferences: Vec<(ToolModelCategory, Vec<String>)>,
    cache: RankedCapabilityCache,
}

impl CatalogProvider {
    /// Start building a provider with the given identity.
    pub fn builder(provider: ProviderType) -> CatalogProviderBuilder {
        CatalogProviderBuilder {
            provider,
            catalog: ModelCatalog::new(),
            restrictions: None,
            transport: None,
            preferences: Vec::new(),
        }
    }
}

/// Builder for [`CatalogProvider`].
pub struct CatalogProviderBuilder {
    provider: ProviderType,
    catalog: ModelCatalog,
    restrictions: Option<Arc<dyn RestrictionPolicy>>,
    transport: Option<Arc<dyn ChatTransport>>,
    preferences: Vec<(ToolModelCategory, Vec<String>)>,
}

impl CatalogProviderBuilder {
    /// Declare a model. Declaration order is the catalogue order.
    pub fn model(mut self, capabilities: ModelCapabilities) -> Self {
        self.catalog.insert(capabilities);
        self
    }

    /// Declare several models at once.
    pub fn models<I>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = ModelCapabilities>,
    {
        for capabilities in models {
            self.catalog.insert(capabilities);
        }
        self
    }

    /// Inject a restriction policy. Without one, every model is allowed.
    pub fn restriction_policy(mut self, policy: Arc<dyn RestrictionPolicy>) -> Self {
        self.restrictions = Some(policy);
        self
    }

    /// Inject the transport used by `generate_content`.
    pub fn transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Nominate preferred models for a tool category, most preferred first.
    pub fn preferred<I, S>(mut self, category: ToolModelCategory, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferences
            .push((category, models.into_iter().map(Into::into).collect()));
        self
    }

    /// Finish building.
    pub fn build(self) -> CatalogProvider {
        CatalogProvider {
            provider: self.provider,
            catalog: self.catalog,
            restrictions: self.restrictions,
            transport: self.transport,
            preferences: self.preferences,
            cache: RankedCapabilityCache::new(),
        }
    }
}

impl ModelProvider for CatalogProvider {
    fn provider_type(&self) -> ProviderType {
        self.provider.clone()
    }

    fn model_configurations(&self) -> ModelCatalog {
        self.catalog.clone()
    }

    fn capability_cache(&self) -> &RankedCapabilityCache {
        &self.cache
    }

    fn restriction_policy(&self) -> Option<&dyn RestrictionPolicy> {
        self.restrictions.as_deref()
    }

    fn generate_content(&self, request: GenerationRequest) -> Result<ModelResponse> {
        let transport = self.transport.as_ref().ok_or_else(|| {
            ProviderError::Transport(format!(
                "provider '{}' has no transport configured",
                self.provider
            ))
        })?;

        let capabilities = self.capabilities(&request.model_name)?;

        let mut request = request;
        request.model_name = capabilities.model_name.clone();
        if let Some(corrected) = capabilities.effective_temperature(request.temperature) {
            request.temperature = corrected;
        }

        transport.complete(&request, &capabilities)
    }

    fn preferred_model(
        &self,
        category: ToolModelCategory,
        allowed_models: &[String],
    ) -> Option<String> {
        let (_, ranked) = self
            .preferences
            .iter()
            .find(|(preferred_category, _)| *preferred_category == category)?;
        ranked
            .iter()
            .find(|name| allowed_models.iter().any(|allowed| allowed == *name))
            .cloned()
    }
}
