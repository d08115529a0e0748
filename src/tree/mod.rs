//! File Tree
//!
//! Hierarchical, deterministically ordered view of a flat file map. Node
//! identity is derived from the path; node digests version the rendered
//! content so unchanged subtrees can be skipped by the rendering layer.

pub mod builder;
pub mod hasher;
pub mod lookup;
pub mod node;
pub mod patch;
pub mod render;

pub use builder::{SortOrder, TreeBuilder, TreeConfig};
pub use lookup::{count_nodes, find_node_by_path, first_file, walk};
pub use node::{FileNode, NodeKind};
pub use patch::replace_file_content;
pub use render::render_tree;
