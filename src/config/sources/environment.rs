//! Environment variable source: STREAMTREE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses STREAMTREE_ prefix and __ as separator for nested keys; list values
/// are comma separated.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("STREAMTREE")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("tree.reserved_segments")
            .try_parsing(true),
    );
    Ok(builder)
}
