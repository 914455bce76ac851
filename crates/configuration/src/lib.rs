use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AuthSettings, Config, DashboardSettings, DatabaseSettings, LoggingSettings, ServerSettings,
};
pub use telemetry::init_tracing;

/// Prefix of environment variables that override file settings,
/// e.g. `TRADEBOOK__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "TRADEBOOK";

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// deserializes it into our strongly-typed `Config` struct, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads configuration from `path`, layering `TRADEBOOK__*` environment variables on top.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
