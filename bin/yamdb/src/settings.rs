//! Runtime settings: defaults, then `yamdb.toml` (optional), then `YAMDB_*`
//! environment variables. A `.env` file is loaded into the environment first.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Insert a small demo catalog if it is not there yet.
    pub seed_demo: bool,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("yamdb").required(false))
            .add_source(Environment::with_prefix("YAMDB"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database_url", "sqlite:yamdb.db")?
            .set_default("max_connections", 5)?
            .set_default("log_level", "info")?
            .set_default("seed_demo", false)
    }
}
