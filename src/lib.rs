//! Streamtree: Deterministic File-Tree Synchronization
//!
//! Keeps a hierarchical file tree, a flat path-to-content map and a file
//! selection in step with a coding agent's streamed workspace. Every snapshot
//! runs through the same synchronous pipeline:
//!
//! raw payload → [`files::normalize_files`] → [`detect::ChangeDetector`] →
//! [`sync::SyncState::reduce`]
//!
//! Identical inputs produce identical trees, ids and selections.

pub mod chat;
pub mod config;
pub mod detect;
pub mod error;
pub mod files;
pub mod logging;
pub mod observer;
pub mod preview;
pub mod session;
pub mod sync;
pub mod tooling;
pub mod tree;
pub mod types;
