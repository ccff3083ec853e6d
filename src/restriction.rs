//! Restriction policy interface.
//!
//! The source of truth for allow/deny decisions (environment variables,
//! configuration files, a remote service) lives outside this crate; only the
//! boolean decision interface is defined here. A provider with no policy
//! injected treats every model as allowed; restriction availability must
//! never fail the resolution pipeline.

use std::collections::{HashMap, HashSet};

use crate::types::ProviderType;

/// Yes/no policy oracle keyed by provider identity and model name.
///
/// `requested_name` carries the originally requested string (possibly an
/// alias) when the caller has one; implementations may honor allow-list
/// entries written against aliases as well as canonical names. Bulk listing
/// passes `None` and evaluates canonical names only.
pub trait RestrictionPolicy: Send + Sync {
    /// Whether `canonical_name` may be used with `provider`.
    fn is_allowed(
        &self,
        provider: &ProviderType,
        canonical_name: &str,
        requested_name: Option<&str>,
    ) -> bool;
}

/// Set-based allow-list policy.
///
/// Names are matched case-insensitively. A provider with no entry, or with
/// an empty set, has no restriction: everything is allowed. A non-empty set
/// allows exactly the listed names (canonical or requested spelling).
#[derive(Debug, Clone, Default)]
pub struct AllowListPolicy {
    allowed: HashMap<ProviderType, HashSet<String>>,
}

impl AllowListPolicy {
    /// A policy with no restrictions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `model_name` for `provider`. The first call for a provider
    /// switches it from unrestricted to allow-list mode.
    pub fn allow(mut self, provider: ProviderType, model_name: impl Into<String>) -> Self {
        self.allowed
            .entry(provider)
            .or_default()
            .insert(model_name.into().to_lowercase());
        self
    }

    /// Whether any restriction is configured for `provider`.
    pub fn is_restricted(&self, provider: &ProviderType) -> bool {
        self.allowed
            .get(provider)
            .is_some_and(|names| !names.is_empty())
    }
}

impl RestrictionPolicy for AllowListPolicy {
    fn is_allowed(
        &self,
        provider: &ProviderType,
        canonical_name: &str,
        requested_name: Option<&str>,
    ) -> bool {
        let Some(names) = self.allowed.get(provider) else {
            return true;
        };
        if names.is_empty() {
            return true;
        }
        if names.contains(&canonical_name.to_lowercase()) {
            return true;
        }
        requested_name.is_some_and(|requested| names.contains(&requested.to_lowercase()))
    }
}
