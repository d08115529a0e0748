//! Tree construction from a flat file map.

use crate::files::{is_reserved_path, DEFAULT_RESERVED_SEGMENTS};
use crate::tree::node::FileNode;
use crate::types::FlatFileMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Name ordering within a folder level (folders always precede files)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Compare lowercased names, falling back to byte order on ties
    #[default]
    CaseInsensitive,
    /// Plain byte order
    CaseSensitive,
}

impl SortOrder {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            SortOrder::CaseInsensitive => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
                .then_with(|| a.cmp(b)),
            SortOrder::CaseSensitive => a.cmp(b),
        }
    }
}

fn default_reserved_segments() -> Vec<String> {
    DEFAULT_RESERVED_SEGMENTS.iter().map(|s| s.to_string()).collect()
}

/// Tree building configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Directory segments hidden from the tree
    #[serde(default = "default_reserved_segments")]
    pub reserved_segments: Vec<String>,

    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            reserved_segments: default_reserved_segments(),
            sort_order: SortOrder::default(),
        }
    }
}

#[derive(Default)]
struct PendingFolder {
    folders: BTreeMap<String, PendingFolder>,
    files: BTreeMap<String, String>,
}

/// Builds ordered node trees from flat file maps.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    config: TreeConfig,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// True when `path` would be hidden from built trees.
    pub fn is_hidden(&self, path: &str) -> bool {
        is_reserved_path(path, &self.config.reserved_segments)
    }

    /// Build the root nodes for `files`.
    ///
    /// The result depends only on the key/content pairs, never on their
    /// iteration order. When a path is both a file and a folder prefix the
    /// folder wins and the file is left out.
    pub fn build(&self, files: &FlatFileMap) -> Vec<Arc<FileNode>> {
        let mut root = PendingFolder::default();
        let mut hidden = 0usize;

        for (path, content) in files.iter() {
            if self.is_hidden(path) {
                hidden += 1;
                continue;
            }
            insert_path(&mut root, path, content);
        }

        let nodes = self.freeze(root, "");
        debug!(
            paths = files.len(),
            hidden,
            roots = nodes.len(),
            "Built file tree"
        );
        nodes
    }

    fn freeze(&self, folder: PendingFolder, prefix: &str) -> Vec<Arc<FileNode>> {
        let mut nodes: Vec<Arc<FileNode>> =
            Vec::with_capacity(folder.folders.len() + folder.files.len());

        for (name, child) in folder.folders {
            let path = join_path(prefix, &name);
            let children = self.freeze(child, &path);
            nodes.push(Arc::new(FileNode::folder(path, name, children)));
        }
        for (name, content) in folder.files {
            let path = join_path(prefix, &name);
            nodes.push(Arc::new(FileNode::file(path, name, content)));
        }

        self.sort_level(&mut nodes);
        nodes
    }

    /// Sort one level: folders first, then names per the configured order.
    pub fn sort_level(&self, nodes: &mut [Arc<FileNode>]) {
        let order = self.config.sort_order;
        nodes.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| order.compare(&a.name, &b.name))
        });
    }
}

fn insert_path(root: &mut PendingFolder, path: &str, content: &str) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some((leaf, dirs)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for dir in dirs {
        if current.files.remove(*dir).is_some() {
            debug!(path = %path, segment = %dir, "Folder replaces file with the same path");
        }
        current = current.folders.entry(dir.to_string()).or_default();
    }

    if current.folders.contains_key(*leaf) {
        debug!(path = %path, "File shadowed by folder with the same path");
        return;
    }
    current.files.insert(leaf.to_string(), content.to_string());
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}
