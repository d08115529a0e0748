//! Configuration
//!
//! Layered settings for tree building, change detection, selection and
//! logging. Sources merge with the `config` crate; see [`MergeService`] for
//! precedence.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use merge::service::MergeService;

use crate::detect::DeletionPolicy;
use crate::logging::LoggingConfig;
use crate::sync::SelectionConfig;
use crate::tree::TreeConfig;
use serde::{Deserialize, Serialize};

/// Change detection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Whether removed paths produce change records
    #[serde(default)]
    pub deletions: DeletionPolicy,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub tree: TreeConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub selection: SelectionConfig,
}
