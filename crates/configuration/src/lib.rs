use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AiSettings, Config, DataSettings, LogFormat, LoggingSettings, ServerSettings,
    SimulationSettings,
};

/// Prefix for environment overrides, e.g. `BUDGET_LENS__SIMULATION__PERIODS=24`.
pub const ENV_PREFIX: &str = "BUDGET_LENS";

/// The conventional variable holding the OpenRouter key, honoured when the config omits it.
pub const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Loads the application configuration.
///
/// Reads `config.toml` from the working directory (optional) or the given path
/// (required), layers `BUDGET_LENS__*` environment variables on top, deserializes
/// the result into our strongly-typed `Config` struct and validates it.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let mut config = builder.try_deserialize::<Config>()?;

    if config.ai.api_key.is_none() {
        config.ai.api_key = std::env::var(OPENROUTER_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty());
    }

    config.validate()?;
    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}
