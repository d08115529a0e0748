//! Plain-text tree rendering for the CLI and logs.

use crate::tree::lookup::walk;
use crate::tree::node::FileNode;
use std::sync::Arc;

/// Render one line per node, two spaces per level, `/` after folder names.
///
/// `marker` names a path to flag with a trailing `*` (the selected file).
pub fn render_tree(nodes: &[Arc<FileNode>], marker: Option<&str>) -> String {
    let mut out = String::new();
    walk(nodes, &mut |node: &FileNode, depth: usize| {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.name);
        if node.is_folder() {
            out.push('/');
        }
        if marker == Some(node.path.as_str()) {
            out.push_str(" *");
        }
        out.push('\n');
    });
    out
}
