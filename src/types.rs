//! Core types for the streaming workspace synchronizer.

use crate::files::canonical_path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// NodeID: Deterministic hash of a tree node's full path
pub type NodeID = [u8; 32];

/// Digest: Version stamp of a node's rendered state (content for files, children for folders)
pub type Digest = [u8; 32];

/// Flat path → content mapping for one streamed snapshot.
///
/// Keys are canonical slash-separated paths; every insertion (including
/// deserialization) canonicalizes the key, so tree node paths and map keys
/// always agree. Iteration follows insertion order, which is the order the
/// backend listed the files in. A map is built once per tick and then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, String>", into = "IndexMap<String, String>")]
pub struct FlatFileMap {
    entries: IndexMap<String, String>,
}

impl FlatFileMap {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Build a map from `(path, content)` pairs; later duplicates overwrite
    /// earlier content but keep the first position.
    pub fn from_pairs<I, P, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let mut map = Self::new();
        for (path, content) in pairs {
            map.insert(path, content);
        }
        map
    }

    /// Insert under the canonical form of `path`. Keys with no path segments
    /// left (`""`, `/`, `./`) are dropped; returns whether the entry was kept.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> bool {
        let Some(key) = canonical_path(&path.into()) else {
            return false;
        };
        self.entries.insert(key, content.into());
        true
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(path, content)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// True when both maps hold exactly the same key set, ignoring order and content.
    pub fn same_paths(&self, other: &FlatFileMap) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mine: HashSet<&str> = self.paths().collect();
        other.paths().all(|p| mine.contains(p))
    }
}

impl From<IndexMap<String, String>> for FlatFileMap {
    fn from(entries: IndexMap<String, String>) -> Self {
        Self::from_pairs(entries)
    }
}

impl From<FlatFileMap> for IndexMap<String, String> {
    fn from(map: FlatFileMap) -> Self {
        map.entries
    }
}
