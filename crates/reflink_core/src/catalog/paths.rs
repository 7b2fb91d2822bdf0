//! Collection breadcrumb resolution.
//!
//! # Responsibility
//! - Map each collection key to `"Root → Mid → Leaf"` style breadcrumbs.
//!
//! # Invariants
//! - Resolution always terminates: each walk tracks visited keys and stops on
//!   the first repeat, flagging the starting key as cyclic.
//! - An unknown parent key truncates the breadcrumb at that point.
//! - Duplicate collection keys resolve to their first occurrence.

use crate::model::collection::Collection;
use log::warn;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Separator placed between breadcrumb segments.
pub const BREADCRUMB_SEPARATOR: &str = " → ";

/// Resolved breadcrumbs for one collection set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionPaths {
    labels: BTreeMap<String, String>,
    cyclic: BTreeSet<String>,
}

impl CollectionPaths {
    /// Returns the breadcrumb for `key`.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Whether the parent chain starting at `key` ran into a cycle.
    pub fn is_cyclic(&self, key: &str) -> bool {
        self.cyclic.contains(key)
    }

    /// Keys whose parent chain was truncated by a cycle.
    pub fn cyclic_keys(&self) -> impl Iterator<Item = &str> {
        self.cyclic.iter().map(String::as_str)
    }

    /// Key -> breadcrumb mapping.
    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Distinct breadcrumbs sorted case-insensitively.
    pub fn sorted_labels(&self) -> Vec<String> {
        let mut labels = self
            .labels
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        labels.sort_by_cached_key(|label| (label.to_lowercase(), label.clone()));
        labels
    }
}

/// Resolves breadcrumbs for every collection.
pub fn resolve_paths(collections: &[Collection]) -> CollectionPaths {
    let mut slot_by_key: HashMap<&str, usize> = HashMap::with_capacity(collections.len());
    for (slot, collection) in collections.iter().enumerate() {
        slot_by_key.entry(collection.key.as_str()).or_insert(slot);
    }

    let mut paths = CollectionPaths::default();
    for (slot, collection) in collections.iter().enumerate() {
        if slot_by_key.get(collection.key.as_str()) != Some(&slot) {
            continue;
        }

        let (segments, cyclic) = walk_ancestors(collections, &slot_by_key, slot);
        if cyclic {
            warn!(
                "event=collection_cycle module=catalog status=truncated depth={}",
                segments.len()
            );
            paths.cyclic.insert(collection.key.clone());
        }
        paths
            .labels
            .insert(collection.key.clone(), segments.join(BREADCRUMB_SEPARATOR));
    }
    paths
}

/// Collects names from root to `start`; returns whether a cycle cut the walk.
fn walk_ancestors<'a>(
    collections: &'a [Collection],
    slot_by_key: &HashMap<&str, usize>,
    start: usize,
) -> (Vec<&'a str>, bool) {
    let mut visited = HashSet::new();
    let mut segments = Vec::new();
    let mut cursor = Some(start);
    let mut cyclic = false;

    while let Some(slot) = cursor {
        if !visited.insert(slot) {
            cyclic = true;
            break;
        }
        let current = &collections[slot];
        segments.push(current.name.as_str());
        cursor = current
            .parent_key
            .as_deref()
            .and_then(|parent| slot_by_key.get(parent).copied());
    }

    segments.reverse();
    (segments, cyclic)
}

#[cfg(test)]
mod tests {
    use super::resolve_paths;
    use crate::model::collection::Collection;

    #[test]
    fn self_parent_is_flagged() {
        let paths = resolve_paths(&[Collection::child("A", "Loop", "A")]);
        assert_eq!(paths.label("A"), Some("Loop"));
        assert!(paths.is_cyclic("A"));
    }

    #[test]
    fn duplicate_keys_keep_first_occurrence() {
        let paths = resolve_paths(&[
            Collection::root("A", "First"),
            Collection::root("A", "Second"),
        ]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths.label("A"), Some("First"));
    }
}
