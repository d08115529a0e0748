//! Tree queries

use crate::tree::node::FileNode;
use std::sync::Arc;

/// Depth-first search for the node whose `path` equals `path`.
pub fn find_node_by_path(nodes: &[Arc<FileNode>], path: &str) -> Option<Arc<FileNode>> {
    for node in nodes {
        if node.path == path {
            return Some(Arc::clone(node));
        }
        if node.is_folder() {
            if let Some(found) = find_node_by_path(&node.children, path) {
                return Some(found);
            }
        }
    }
    None
}

/// First file in display order.
pub fn first_file(nodes: &[Arc<FileNode>]) -> Option<Arc<FileNode>> {
    for node in nodes {
        if node.is_file() {
            return Some(Arc::clone(node));
        }
        if let Some(found) = first_file(&node.children) {
            return Some(found);
        }
    }
    None
}

/// Count `(folders, files)` in the tree.
pub fn count_nodes(nodes: &[Arc<FileNode>]) -> (usize, usize) {
    nodes.iter().fold((0, 0), |(folders, files), node| {
        if node.is_folder() {
            let (f, fl) = count_nodes(&node.children);
            (folders + 1 + f, files + fl)
        } else {
            (folders, files + 1)
        }
    })
}

/// Visit every node in display order (pre-order) with its depth.
pub fn walk<F: FnMut(&FileNode, usize)>(nodes: &[Arc<FileNode>], visit: &mut F) {
    walk_at(nodes, 0, visit);
}

fn walk_at<F: FnMut(&FileNode, usize)>(nodes: &[Arc<FileNode>], depth: usize, visit: &mut F) {
    for node in nodes {
        visit(node, depth);
        walk_at(&node.children, depth + 1, visit);
    }
}
