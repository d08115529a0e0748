//! Integration tests for streamed workspace synchronization

mod cli_contracts;
mod scenarios;
mod session_pipeline;
mod tree_properties;
