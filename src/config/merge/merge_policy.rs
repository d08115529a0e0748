//! Base builder carrying the compiled-in defaults as the lowest layer.

use crate::config::AppConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&AppConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
