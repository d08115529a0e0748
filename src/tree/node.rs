//! File tree node types

use crate::tree::hasher::{compute_file_digest, compute_folder_digest, compute_node_id};
use crate::types::{Digest, NodeID};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    // Declared first so folders order before files.
    Folder,
    File,
}

/// One file or folder in the visible workspace tree.
///
/// Children are shared through `Arc` so that a content-only update can swap
/// the changed leaf and its ancestors while every untouched branch keeps the
/// same allocation. `digest` changes iff the rendered subtree changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    #[serde(serialize_with = "serialize_hex")]
    pub id: NodeID,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<FileNode>>,
    #[serde(serialize_with = "serialize_hex")]
    pub digest: Digest,
}

impl FileNode {
    /// Create a file node
    pub fn file(path: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        Self {
            id: compute_node_id(&path),
            name: name.into(),
            kind: NodeKind::File,
            digest: compute_file_digest(&content),
            path,
            content: Some(content),
            children: Vec::new(),
        }
    }

    /// Create a folder node; `children` must already be ordered.
    pub fn folder(
        path: impl Into<String>,
        name: impl Into<String>,
        children: Vec<Arc<FileNode>>,
    ) -> Self {
        let path = path.into();
        Self {
            id: compute_node_id(&path),
            name: name.into(),
            kind: NodeKind::Folder,
            digest: compute_folder_digest(&children),
            path,
            content: None,
            children,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}
