//! ResolutionCache - first resolution of each reference, per top-level call.
//!
//! Keyed by the raw reference string only. The flags of the call site that
//! first resolved a reference are baked into the cached node, and every later
//! occurrence reuses it verbatim.

use crate::node::SchemaNode;
use std::collections::HashMap;

/// A cached resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Number of references on the path when this one was first resolved.
    pub depth: usize,
    /// Resolved body, or the untouched reference node if it did not resolve.
    pub resolved: SchemaNode,
    /// Whether the reference target was found.
    pub found: bool,
}

/// Reference string -> first resolution.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &str) -> Option<&CacheEntry> {
        self.entries.get(reference)
    }

    /// Record a resolution. The first write for a reference wins; later writes
    /// are ignored.
    pub fn insert(&mut self, reference: &str, entry: CacheEntry) {
        self.entries
            .entry(reference.to_string())
            .or_insert(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// References whose targets were not found.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.found)
            .map(|(reference, _)| reference.as_str())
    }
}
