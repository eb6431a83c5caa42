//! Global config file source: $XDG_CONFIG_HOME/treesync/config.toml

use crate::config::xdg;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use tracing::debug;

/// Add the global config file to the builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Ok(path) = xdg::global_config_path() else {
        return Ok(builder);
    };

    if path.is_file() {
        debug!(config_path = %path.display(), "Loading global configuration");
        builder = builder.add_source(File::from(path).required(false));
    }
    Ok(builder)
}
