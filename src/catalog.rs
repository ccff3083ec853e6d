//! The capability catalogue: an insertion-ordered map from canonical model
//! name to [`ModelCapabilities`].
//!
//! Iteration order is load-bearing: it is the tie-break order for alias
//! resolution (first match wins) and the base order for listing.

use std::collections::HashMap;

use crate::types::ModelCapabilities;

/// Insertion-ordered mapping from canonical model name to capabilities.
///
/// Canonical names are case-sensitive keys and unique within a catalogue;
/// inserting a name twice replaces the earlier entry in place, keeping its
/// position.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    entries: Vec<(String, ModelCapabilities)>,
    index: HashMap<String, usize>,
}

impl ModelCatalog {
    /// An empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalogue from capability entries, preserving order.
    pub fn with_models<I>(models: I) -> Self
    where
        I: IntoIterator<Item = ModelCapabilities>,
    {
        let mut catalog = Self::new();
        for capabilities in models {
            catalog.insert(capabilities);
        }
        catalog
    }

    /// Insert an entry keyed by its canonical model name. Replaces in place
    /// when the name is already present.
    pub fn insert(&mut self, capabilities: ModelCapabilities) {
        let name = capabilities.model_name.clone();
        match self.index.get(&name) {
            Some(&position) => self.entries[position].1 = capabilities,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, capabilities));
            }
        }
    }

    /// Look up an entry by exact canonical name.
    pub fn get(&self, canonical_name: &str) -> Option<&ModelCapabilities> {
        self.index
            .get(canonical_name)
            .map(|&position| &self.entries[position].1)
    }

    /// Whether `canonical_name` is an exact catalogue key.
    pub fn contains(&self, canonical_name: &str) -> bool {
        self.index.contains_key(canonical_name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelCapabilities)> {
        self.entries
            .iter()
            .map(|(name, capabilities)| (name.as_str(), capabilities))
    }

    /// Canonical names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Resolve a requested name to a canonical catalogue key.
    ///
    /// Strict order, stopping at the first match:
    /// 1. exact case-sensitive key match, returned as-is;
    /// 2. case-insensitive key match, returning the canonical key's casing;
    /// 3. case-insensitive alias match, in catalogue iteration order;
    /// 4. no match: the input is returned unchanged.
    ///
    /// Resolution is total and never fails by itself; an unresolved name
    /// surfaces later as an `UnsupportedModel` at lookup. A base name always
    /// wins over an alias, even when an alias collides case-insensitively
    /// with a differently-cased base name.
    pub fn resolve(&self, requested_name: &str) -> String {
        if self.index.contains_key(requested_name) {
            return requested_name.to_string();
        }

        let requested_lower = requested_name.to_lowercase();

        for (name, _) in &self.entries {
            if name.to_lowercase() == requested_lower {
                return name.clone();
            }
        }

        for (name, capabilities) in &self.entries {
            if capabilities
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase() == requested_lower)
            {
                return name.clone();
            }
        }

        requested_name.to_string()
    }

    /// Map canonical name to its aliases, skipping alias-less entries.
    pub fn collect_aliases(&self) -> HashMap<String, Vec<String>> {
        self.entries
            .iter()
            .filter(|(_, capabilities)| !capabilities.aliases.is_empty())
            .map(|(name, capabilities)| (name.clone(), capabilities.aliases.clone()))
            .collect()
    }

    /// Formatted model names in catalogue order.
    ///
    /// Each canonical name is optionally followed by its aliases; `lowercase`
    /// folds everything, and `unique` drops later duplicates while keeping
    /// the first occurrence.
    pub fn collect_model_names(
        &self,
        include_aliases: bool,
        lowercase: bool,
        unique: bool,
    ) -> Vec<String> {
        let mut names = Vec::new();
        for (name, capabilities) in &self.entries {
            names.push(name.clone());
            if include_aliases {
                names.extend(capabilities.aliases.iter().cloned());
            }
        }

        if lowercase {
            for name in &mut names {
                *name = name.to_lowercase();
            }
        }

        if unique {
            let mut seen = std::collections::HashSet::new();
            names.retain(|name| seen.insert(name.clone()));
        }

        names
    }
}

impl FromIterator<ModelCapabilities> for ModelCatalog {
    fn from_iter<I: IntoIterator<Item = ModelCapabilities>>(iter: I) -> Self {
        Self::with_models(iter)
    }
}
