//! Concrete provider implementations.
//!
//! Two variants of the capability catalogue are covered:
//! [`catalog::CatalogProvider`] for statically declared catalogues and
//! [`custom::CustomProvider`] for registry-backed (dynamic) ones. Actual
//! request transport stays outside this crate; both providers delegate
//! generation to an injected [`ChatTransport`].

pub mod catalog;
pub mod custom;

pub use catalog::CatalogProvider;
pub use custom::CustomProvider;

use crate::error::Result;
use crate::types::{GenerationRequest, ModelCapabilities, ModelResponse};

/// Strategy object carrying a request across the transport boundary.
///
/// By the time `complete` is called the request's model name is canonical,
/// the model is known and allowed, and the temperature has been corrected
/// per the model's constraint.
pub trait ChatTransport: Send + Sync {
    fn complete(
        &self,
        request: &GenerationRequest,
        capabilities: &ModelCapabilities,
    ) -> Result<ModelResponse>;
}

impl<F> ChatTransport for F
where
    F: Fn(&GenerationRequest, &ModelCapabilities) -> Result<ModelResponse> + Send + Sync,
{
    fn complete(
        &self,
        request: &GenerationRequest,
        capabilities: &ModelCapabilities,
    ) -> Result<ModelResponse> {
        self(request, capabilities)
    }
}
