//! The provider interface and the shared capability-resolution pipeline.
//!
//! [`ModelProvider`] is the uniform surface every model backend exposes for
//! listing models, resolving aliases, and validating requests. Concrete
//! providers supply their catalogue and identity; the pipeline itself
//! (resolve, lookup, restriction check, finalize) ships as default
//! methods, with `lookup_capabilities`, `finalize_capabilities`, and
//! `ensure_model_allowed` as the overridable hook points for
//! registry-backed variants.

use std::sync::{Arc, RwLock};

use crate::catalog::ModelCatalog;
use crate::error::{ProviderError, Result};
use crate::registry::CapabilityModelRegistry;
use crate::restriction::RestrictionPolicy;
use crate::types::{
    GenerationRequest, ModelCapabilities, ModelResponse, ProviderType, ToolModelCategory,
};

/// Options for [`ModelProvider::list_models`].
#[derive(Debug, Clone)]
pub struct ListModelsOptions {
    /// Filter entries through the restriction policy (canonical names only)
    pub respect_restrictions: bool,
    /// Follow each canonical name with its aliases
    pub include_aliases: bool,
    /// Lowercase every returned name
    pub lowercase: bool,
    /// Drop later duplicates, keeping the first occurrence
    pub unique: bool,
}

impl Default for ListModelsOptions {
    fn default() -> Self {
        Self {
            respect_restrictions: true,
            include_aliases: true,
            lowercase: false,
            unique: false,
        }
    }
}

/// A catalogue entry paired with its canonical name, as returned by
/// [`ModelProvider::capabilities_by_rank`].
pub type RankedModel = (String, ModelCapabilities);

/// Lazily computed, explicitly invalidated snapshot of a provider's
/// catalogue sorted by capability rank.
///
/// Each provider instance owns one. The snapshot never expires on a timer;
/// after any dynamic catalogue mutation (for example a registry reload) the
/// owner must call [`invalidate`](Self::invalidate). Reads are lock-light:
/// the sorted snapshot is swapped in atomically behind a read-mostly lock.
#[derive(Debug, Default)]
pub struct RankedCapabilityCache {
    snapshot: RwLock<Option<Arc<Vec<RankedModel>>>>,
}

impl RankedCapabilityCache {
    /// An empty (uncomputed) cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, computing it with `build` on first use.
    pub fn get_or_compute<F>(&self, build: F) -> Arc<Vec<RankedModel>>
    where
        F: FnOnce() -> Vec<RankedModel>,
    {
        if let Some(cached) = self.snapshot.read().unwrap().as_ref() {
            return Arc::clone(cached);
        }

        let computed = Arc::new(build());
        let mut guard = self.snapshot.write().unwrap();
        // A concurrent computation may have won the race; keep its snapshot
        // so repeated calls keep returning one identity.
        if let Some(cached) = guard.as_ref() {
            return Arc::clone(cached);
        }
        *guard = Some(Arc::clone(&computed));
        computed
    }

    /// Drop the snapshot; the next read recomputes.
    pub fn invalidate(&self) {
        *self.snapshot.write().unwrap() = None;
    }
}

/// Uniform interface over a model backend's catalogue.
///
/// Required operations: provider identity, catalogue access, the per-instance
/// ranked cache, and content generation (whose transport lives outside this
/// crate). Everything else, from name resolution and the
/// lookup/restriction pipeline to listing and ranking, is shared default
/// behavior.
pub trait ModelProvider: Send + Sync {
    /// Provider identity, used by restriction policies and error messages.
    fn provider_type(&self) -> ProviderType;

    /// The current catalogue snapshot.
    ///
    /// Statically-declared providers return their fixed catalogue; dynamic
    /// providers rebuild the snapshot from their registry on every call.
    fn model_configurations(&self) -> ModelCatalog;

    /// The instance-owned ranked snapshot cache.
    fn capability_cache(&self) -> &RankedCapabilityCache;

    /// Generate content for a request. Name resolution and parameter
    /// correction happen before the request crosses the transport boundary.
    fn generate_content(&self, request: GenerationRequest) -> Result<ModelResponse>;

    /// The injected restriction policy; `None` means no restriction
    /// (fail open).
    fn restriction_policy(&self) -> Option<&dyn RestrictionPolicy> {
        None
    }

    /// Resolve a model shorthand to its canonical catalogue name.
    ///
    /// Total: unknown names come back unchanged and surface later as
    /// [`ProviderError::UnsupportedModel`] at lookup.
    fn resolve_model_name(&self, model_name: &str) -> String {
        let resolved = self.model_configurations().resolve(model_name);
        if resolved != model_name {
            tracing::debug!("resolved model alias '{model_name}' to '{resolved}'");
        }
        resolved
    }

    /// Hook: fetch capabilities for a canonical name.
    ///
    /// The default reads the static catalogue; registry-backed providers
    /// override this to query their registry instead.
    fn lookup_capabilities(
        &self,
        canonical_name: &str,
        _requested_name: &str,
    ) -> Option<ModelCapabilities> {
        self.model_configurations().get(canonical_name).cloned()
    }

    /// Hook: adjust capabilities before they are returned (for example,
    /// merge registry-sourced overrides). Returns a copy; catalogue entries
    /// themselves are never mutated.
    fn finalize_capabilities(
        &self,
        capabilities: ModelCapabilities,
        _requested_name: &str,
    ) -> ModelCapabilities {
        capabilities
    }

    /// Hook: consult the restriction policy for a resolved model.
    ///
    /// Both the canonical name and the originally requested string are
    /// passed, so policies may honor alias spellings. No policy means no
    /// restriction.
    fn ensure_model_allowed(
        &self,
        _capabilities: &ModelCapabilities,
        canonical_name: &str,
        requested_name: &str,
    ) -> Result<()> {
        let Some(policy) = self.restriction_policy() else {
            return Ok(());
        };
        if policy.is_allowed(&self.provider_type(), canonical_name, Some(requested_name)) {
            Ok(())
        } else {
            Err(ProviderError::RestrictedModel {
                provider: self.provider_type(),
                model: requested_name.to_string(),
            })
        }
    }

    /// Capabilities for a model name or alias.
    ///
    /// Resolves the name, looks up the catalogue (or registry), enforces the
    /// restriction policy, and applies the finalize hook. Idempotent for an
    /// unchanged catalogue and policy.
    fn capabilities(&self, model_name: &str) -> Result<ModelCapabilities> {
        let canonical_name = self.resolve_model_name(model_name);

        let capabilities = self
            .lookup_capabilities(&canonical_name, model_name)
            .ok_or_else(|| ProviderError::UnsupportedModel {
                provider: self.provider_type(),
                model: model_name.to_string(),
            })?;

        self.ensure_model_allowed(&capabilities, &canonical_name, model_name)?;

        Ok(self.finalize_capabilities(capabilities, model_name))
    }

    /// Whether `model_name` resolves to a usable (known and allowed) model.
    fn validate_model_name(&self, model_name: &str) -> bool {
        self.capabilities(model_name).is_ok()
    }

    /// Validate request parameters against the model's capabilities.
    ///
    /// Temperature is the only parameter checked here; provider-specific
    /// parameters are validated downstream.
    fn validate_parameters(&self, model_name: &str, temperature: f64) -> Result<()> {
        let capabilities = self.capabilities(model_name)?;
        let constraint = &capabilities.temperature_constraint;
        if !constraint.validate(temperature) {
            return Err(ProviderError::InvalidParameter(format!(
                "temperature {temperature} is invalid for model {model_name}. {}",
                constraint.description()
            )));
        }
        Ok(())
    }

    /// The temperature to send downstream for `model_name`, or `None` when
    /// the model does not accept the parameter at all.
    fn effective_temperature(&self, model_name: &str, requested: f64) -> Result<Option<f64>> {
        Ok(self.capabilities(model_name)?.effective_temperature(requested))
    }

    /// The full catalogue, without restriction filtering.
    fn all_model_capabilities(&self) -> ModelCatalog {
        self.model_configurations()
    }

    /// The catalogue ordered by descending capability rank, ties broken by
    /// ascending canonical name.
    ///
    /// Cached per instance; repeated calls return the same snapshot until
    /// [`invalidate_capability_cache`](Self::invalidate_capability_cache).
    fn capabilities_by_rank(&self) -> Arc<Vec<RankedModel>> {
        self.capability_cache().get_or_compute(|| {
            let mut ranked: Vec<RankedModel> = self
                .model_configurations()
                .iter()
                .map(|(name, capabilities)| (name.to_string(), capabilities.clone()))
                .collect();
            ranked.sort_by(|(name_a, caps_a), (name_b, caps_b)| {
                caps_b
                    .effective_capability_rank()
                    .cmp(&caps_a.effective_capability_rank())
                    .then_with(|| name_a.cmp(name_b))
            });
            ranked
        })
    }

    /// Drop the ranked snapshot. Required after any dynamic catalogue
    /// mutation, such as a registry reload.
    fn invalidate_capability_cache(&self) {
        self.capability_cache().invalidate();
    }

    /// Formatted model names supported by this provider.
    ///
    /// With `respect_restrictions`, each catalogue entry is filtered through
    /// the restriction policy by canonical name; a denied model disappears
    /// together with its aliases. Listing deliberately does not evaluate
    /// alias spellings against the policy; only [`capabilities`](Self::capabilities)
    /// does that, via the originally requested name.
    fn list_models(&self, options: &ListModelsOptions) -> Vec<String> {
        let catalog = self.model_configurations();
        if catalog.is_empty() {
            return Vec::new();
        }

        let policy = options
            .respect_restrictions
            .then(|| self.restriction_policy())
            .flatten();

        let catalog = match policy {
            Some(policy) => {
                let provider = self.provider_type();
                catalog
                    .iter()
                    .filter(|(name, _)| policy.is_allowed(&provider, name, None))
                    .map(|(_, capabilities)| capabilities.clone())
                    .collect()
            }
            None => catalog,
        };

        catalog.collect_model_names(options.include_aliases, options.lowercase, options.unique)
    }

    /// A provider's preferred model for a tool category, chosen from a
    /// pre-filtered allow-list. The base behavior has no opinion.
    fn preferred_model(
        &self,
        _category: ToolModelCategory,
        _allowed_models: &[String],
    ) -> Option<String> {
        None
    }

    /// The dynamic registry backing this provider's catalogue, when one
    /// exists.
    fn model_registry(&self) -> Option<&CapabilityModelRegistry> {
        None
    }

    /// Estimate token usage for a piece of text.
    ///
    /// A character-based heuristic (roughly four characters per token for
    /// English text) that works without provider tooling; providers with an
    /// exact tokenizer should override it.
    fn count_tokens(&self, text: &str, model_name: &str) -> u64 {
        if text.is_empty() {
            return 0;
        }
        let resolved = self.resolve_model_name(model_name);
        let estimated = (text.chars().count() as u64 / 4).max(1);
        tracing::debug!("estimating {estimated} tokens for model {resolved} via character heuristic");
        estimated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_returns_the_same_snapshot_until_invalidated() {
        let cache = RankedCapabilityCache::new();
        let first = cache.get_or_compute(Vec::new);
        let second = cache.get_or_compute(|| panic!("must not recompute"));
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate();
        let third = cache.get_or_compute(Vec::new);
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn list_models_options_defaults() {
        let options = ListModelsOptions::default();
        assert!(options.respect_restrictions);
        assert!(options.include_aliases);
        assert!(!options.lowercase);
        assert!(!options.unique);
    }
}
