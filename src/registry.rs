//! Dynamic, file-backed model registry.
//!
//! Registry-backed providers source their catalogue from a JSON
//! model-configuration file instead of a static declaration:
//!
//! ```json
//! {
//!   "models": [
//!     {
//!       "model_name": "llama3",
//!       "context_window": 128000,
//!       "aliases": ["local-llama"],
//!       "temperature_constraint": "range",
//!       "is_custom": true
//!     }
//!   ]
//! }
//! ```
//!
//! The file path is resolved from an explicit override, then an environment
//! variable, then a default filename. A missing file yields an empty
//! registry (logged, not fatal); malformed contents and duplicate names or
//! aliases are hard configuration errors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::ModelCatalog;
use crate::error::{ProviderError, Result};
use crate::types::{ModelCapabilities, ProviderType};

/// Environment variable consulted for the configuration file path.
pub const CONFIG_PATH_ENV_VAR: &str = "MODELCAPS_CUSTOM_MODELS_PATH";

/// Default configuration filename, relative to the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "custom_models.json";

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    models: Vec<ModelCapabilities>,
}

/// A catalogue loaded from a JSON model-configuration file.
///
/// The registry owns a [`ModelCatalog`] snapshot rebuilt on every
/// [`reload`](Self::reload). Providers backed by a registry must invalidate
/// their ranked capability cache after a reload; see
/// [`CustomProvider::reload_registry`](crate::providers::custom::CustomProvider::reload_registry).
pub struct CapabilityModelRegistry {
    provider: ProviderType,
    friendly_prefix: String,
    config_path: PathBuf,
    catalog: ModelCatalog,
}

impl CapabilityModelRegistry {
    /// Create a registry and load it from the resolved configuration path.
    ///
    /// Path resolution order: `config_path` argument, the
    /// [`CONFIG_PATH_ENV_VAR`] environment variable, then
    /// [`DEFAULT_CONFIG_FILENAME`]. Every loaded entry is stamped with
    /// `provider`; entries without a friendly name get `friendly_prefix`
    /// with `{model}` substituted.
    pub fn new(
        provider: ProviderType,
        friendly_prefix: impl Into<String>,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config_path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));

        let mut registry = Self {
            provider,
            friendly_prefix: friendly_prefix.into(),
            config_path,
            catalog: ModelCatalog::new(),
        };
        registry.reload()?;
        Ok(registry)
    }

    /// Re-read the configuration file and rebuild the catalogue.
    pub fn reload(&mut self) -> Result<()> {
        if !self.config_path.exists() {
            tracing::warn!(
                "model configuration file {} not found; registry is empty",
                self.config_path.display()
            );
            self.catalog = ModelCatalog::new();
            return Ok(());
        }

        let raw = std::fs::read_to_string(&self.config_path)?;
        let file: RegistryFile = serde_json::from_str(&raw)?;

        let mut catalog = ModelCatalog::new();
        // Case-insensitive name -> owner, for collision detection across
        // canonical names and aliases alike.
        let mut claimed: HashMap<String, String> = HashMap::new();

        for entry in file.models {
            let capabilities = self.finalize_entry(entry);
            let canonical = capabilities.model_name.clone();

            if catalog.contains(&canonical) {
                return Err(ProviderError::Config(format!(
                    "duplicate model name '{canonical}' in {}",
                    self.config_path.display()
                )));
            }

            for name in std::iter::once(&canonical).chain(capabilities.aliases.iter()) {
                let key = name.to_lowercase();
                if let Some(owner) = claimed.get(&key) {
                    return Err(ProviderError::Config(format!(
                        "name '{name}' of model '{canonical}' collides with model '{owner}' in {}",
                        self.config_path.display()
                    )));
                }
                claimed.insert(key, canonical.clone());
            }

            catalog.insert(capabilities);
        }

        let alias_count: usize = catalog.iter().map(|(_, c)| c.aliases.len()).sum();
        tracing::info!(
            "loaded {} models with {} aliases from {}",
            catalog.len(),
            alias_count,
            self.config_path.display()
        );

        self.catalog = catalog;
        Ok(())
    }

    fn finalize_entry(&self, mut entry: ModelCapabilities) -> ModelCapabilities {
        entry.provider = self.provider.clone();
        if entry.friendly_name.is_empty() {
            entry.friendly_name = self.friendly_prefix.replace("{model}", &entry.model_name);
        }
        entry
    }

    /// Alias-aware, case-insensitive lookup returning an owned copy.
    pub fn resolve(&self, name: &str) -> Option<ModelCapabilities> {
        let canonical = self.catalog.resolve(name);
        self.catalog.get(&canonical).cloned()
    }

    /// Capabilities for an exact canonical name.
    pub fn capabilities(&self, canonical_name: &str) -> Option<&ModelCapabilities> {
        self.catalog.get(canonical_name)
    }

    /// Canonical model names in configuration order.
    pub fn list_models(&self) -> Vec<String> {
        self.catalog.names()
    }

    /// All aliases, in configuration order.
    pub fn list_aliases(&self) -> Vec<String> {
        self.catalog
            .iter()
            .flat_map(|(_, capabilities)| capabilities.aliases.iter().cloned())
            .collect()
    }

    /// The current catalogue snapshot.
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// The resolved configuration file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The provider identity stamped onto loaded entries.
    pub fn provider(&self) -> &ProviderType {
        &self.provider
    }
}
