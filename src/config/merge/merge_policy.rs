//! Merge rules: defaults, then global file, workspace file and environment.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};

/// Prefix for environment overrides, e.g. `TREESYNC_SNAPSHOT_DIR`
pub const ENV_PREFIX: &str = "TREESYNC";

/// Create a Config builder with defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("ignore_patterns", Vec::<String>::new())?
        .set_default("use_gitignore", false)
}

/// Environment source; list values are comma separated.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("ignore_patterns")
}
