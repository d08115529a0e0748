//! Hash computation for tree nodes

use crate::tree::node::{FileNode, NodeKind};
use crate::types::{Digest, NodeID};
use std::sync::Arc;

const NODE_ID_DOMAIN: &[u8] = b"streamtree:node:v1\0";
const FILE_DIGEST_DOMAIN: &[u8] = b"streamtree:file:v1\0";
const FOLDER_DIGEST_DOMAIN: &[u8] = b"streamtree:folder:v1\0";

/// Compute NodeID for a node from its full canonical path.
///
/// Identity depends on the path only, so a node keeps its id across content
/// edits and across rebuilds.
pub fn compute_node_id(path: &str) -> NodeID {
    let mut hasher = blake3::Hasher::new();
    hasher.update(NODE_ID_DOMAIN);
    hasher.update(path.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Compute the digest of a file's content
pub fn compute_file_digest(content: &str) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(FILE_DIGEST_DOMAIN);
    hasher.update(content.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Compute a folder digest over its ordered children.
///
/// Each child contributes its length-prefixed name, kind and digest.
pub fn compute_folder_digest(children: &[Arc<FileNode>]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(FOLDER_DIGEST_DOMAIN);
    hasher.update(&(children.len() as u64).to_le_bytes());
    for child in children {
        hasher.update(&(child.name.len() as u64).to_le_bytes());
        hasher.update(child.name.as_bytes());
        hasher.update(&[match child.kind {
            NodeKind::Folder => 0u8,
            NodeKind::File => 1u8,
        }]);
        hasher.update(&child.digest);
    }
    *hasher.finalize().as_bytes()
}
