//! Tooling
//!
//! Command-line access to the synchronization pipeline for replaying recorded
//! streams and inspecting file maps outside a UI.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
