//! Autoload map: the reverse index projection handed to a loader

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::SymbolKind;

/// Per-kind mapping from symbol name to a path relative to the project root.
///
/// Class, function and type names are stored lower-cased. Constant names keep
/// their exact case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoloadMap {
    #[serde(default)]
    pub class: HashMap<String, String>,

    #[serde(default)]
    pub function: HashMap<String, String>,

    #[serde(default, rename = "type")]
    pub type_alias: HashMap<String, String>,

    #[serde(default)]
    pub constant: HashMap<String, String>,
}

impl AutoloadMap {
    /// Create an empty map with all four partitions present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the partition for a kind.
    pub fn partition(&self, kind: SymbolKind) -> &HashMap<String, String> {
        match kind {
            SymbolKind::Class => &self.class,
            SymbolKind::Function => &self.function,
            SymbolKind::Type => &self.type_alias,
            SymbolKind::Constant => &self.constant,
        }
    }

    /// Get a mutable partition for a kind.
    pub fn partition_mut(&mut self, kind: SymbolKind) -> &mut HashMap<String, String> {
        match kind {
            SymbolKind::Class => &mut self.class,
            SymbolKind::Function => &mut self.function,
            SymbolKind::Type => &mut self.type_alias,
            SymbolKind::Constant => &mut self.constant,
        }
    }

    /// Insert an already-normalized name, replacing any previous entry.
    ///
    /// Returns the path that was replaced, if any.
    pub fn insert(&mut self, kind: SymbolKind, name: String, path: String) -> Option<String> {
        self.partition_mut(kind).insert(name, path)
    }

    /// Look up a symbol, applying the kind's case rule to `name` first.
    pub fn lookup(&self, kind: SymbolKind, name: &str) -> Option<&str> {
        self.partition(kind)
            .get(kind.normalize(name).as_ref())
            .map(String::as_str)
    }

    /// Resolve a symbol to a loadable path under `base`.
    pub fn resolve(&self, kind: SymbolKind, name: &str, base: &Path) -> Option<PathBuf> {
        self.lookup(kind, name).map(|relative| base.join(relative))
    }

    /// Iterate over every `(kind, name, path)` entry.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolKind, &str, &str)> + '_ {
        SymbolKind::ALL.into_iter().flat_map(move |kind| {
            self.partition(kind)
                .iter()
                .map(move |(name, path)| (kind, name.as_str(), path.as_str()))
        })
    }

    /// Total number of entries across all kinds.
    pub fn len(&self) -> usize {
        SymbolKind::ALL
            .iter()
            .map(|kind| self.partition(*kind).len())
            .sum()
    }

    /// Check if no kind has any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overlay `other` onto this map. Entries from `other` win on collisions.
    pub fn merge_from(&mut self, other: &AutoloadMap) {
        for (kind, name, path) in other.iter() {
            self.insert(kind, name.to_string(), path.to_string());
        }
    }
}

/// Merge two maps. For every kind, entries of `right` overwrite entries of
/// `left` with the same name; the operation is not commutative.
pub fn merge_maps(mut left: AutoloadMap, right: &AutoloadMap) -> AutoloadMap {
    left.merge_from(right);
    left
}
