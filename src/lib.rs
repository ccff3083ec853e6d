//! modelcaps
//!
//! A uniform abstraction over heterogeneous model backends ("providers"),
//! each exposing a catalogue of named models with differing capabilities,
//! aliases, and parameter constraints. The core is the capability-resolution
//! pipeline: a user-supplied model name (possibly an alias, possibly
//! miscased) is resolved to canonical capability metadata, checked against
//! an injected restriction policy, and validated against per-model parameter
//! constraints; providers also expose ranked, cached views of their
//! catalogue.
//!
//! Network transport, response parsing, retry policy, and authentication are
//! deliberately outside this crate; [`providers::ChatTransport`] marks that
//! boundary.
//!
//! # Example
//!
//! ```
//! use modelcaps::prelude::*;
//!
//! let provider = CatalogProvider::builder(ProviderType::OpenAi)
//!     .model(
//!         ModelCapabilities::new(ProviderType::OpenAi, "gpt-5")
//!             .with_alias("fast")
//!             .with_context_window(400_000),
//!     )
//!     .build();
//!
//! let caps = provider.capabilities("FAST").unwrap();
//! assert_eq!(caps.model_name, "gpt-5");
//! ```
#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod restriction;
pub mod types;

pub use catalog::ModelCatalog;
pub use error::{ProviderError, Result};
pub use provider::{ListModelsOptions, ModelProvider, RankedCapabilityCache, RankedModel};
pub use registry::CapabilityModelRegistry;
pub use restriction::{AllowListPolicy, RestrictionPolicy};
pub use types::{
    GenerationRequest, ModelCapabilities, ModelResponse, ProviderType, TemperatureConstraint,
    TokenUsage, ToolModelCategory,
};

/// Convenience re-exports for callers.
pub mod prelude {
    pub use crate::catalog::ModelCatalog;
    pub use crate::error::{ProviderError, Result};
    pub use crate::provider::{ListModelsOptions, ModelProvider, RankedCapabilityCache};
    pub use crate::providers::{CatalogProvider, ChatTransport, CustomProvider};
    pub use crate::registry::CapabilityModelRegistry;
    pub use crate::restriction::{AllowListPolicy, RestrictionPolicy};
    pub use crate::types::{
        GenerationRequest, ModelCapabilities, ModelResponse, ProviderType, TemperatureConstraint,
        ToolModelCategory,
    };
}
