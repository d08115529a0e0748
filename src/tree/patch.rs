//! Content-only tree updates with structural sharing.

use crate::tree::node::FileNode;
use std::sync::Arc;

/// Replace the content of the file at `path`, copying only the root→leaf chain.
///
/// Every sibling off the chain keeps its `Arc`, and folder digests along the
/// chain are recomputed. Returns `None` when no file lives at `path` or the
/// content is already identical.
pub fn replace_file_content(
    nodes: &[Arc<FileNode>],
    path: &str,
    content: &str,
) -> Option<Vec<Arc<FileNode>>> {
    for (index, node) in nodes.iter().enumerate() {
        let replacement = if node.path == path {
            if !node.is_file() || node.content_str() == content {
                return None;
            }
            FileNode::file(node.path.clone(), node.name.clone(), content)
        } else if node.is_folder() && is_descendant(path, &node.path) {
            let children = replace_file_content(&node.children, path, content)?;
            FileNode::folder(node.path.clone(), node.name.clone(), children)
        } else {
            continue;
        };

        let mut patched = nodes.to_vec();
        patched[index] = Arc::new(replacement);
        return Some(patched);
    }
    None
}

fn is_descendant(path: &str, folder: &str) -> bool {
    path.len() > folder.len() + 1
        && path.starts_with(folder)
        && path.as_bytes()[folder.len()] == b'/'
}
