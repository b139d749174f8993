use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Create the SQLite file when it does not exist yet.
    pub create_if_missing: bool,
    /// Run `CREATE TABLE IF NOT EXISTS users ...` on startup.
    pub create_schema: bool,
}

/// Behavior switches for the `/users` routes.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Apply the name/age rules on create as well as on update.
    pub validate_on_create: bool,
    /// Report malformed ids/ages as 400 and a missing row on read as 404
    /// instead of 500.
    pub strict_errors: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        defaults(Config::builder())?
            // Add in settings from the config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // E.g., `APP_SERVER__PORT=5001` would set `Settings.server.port`
            .add_source(app_environment())
            .build()?
            .try_deserialize()
    }

    /// Settings backed by a single-connection in-memory store with the
    /// schema created on startup. Ignores config files and the environment.
    pub fn new_for_test() -> Result<Self, ConfigError> {
        defaults(Config::builder())?
            .set_override("environment", "test")?
            .set_override("server.workers", 1)?
            .set_override("database.url", "sqlite::memory:")?
            .set_override("database.max_connections", 1)?
            .set_override("database.create_schema", true)?
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("environment", "development")?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.workers", num_cpus::get() as i64)?
        .set_default("database.url", "sqlite://example.db")?
        .set_default("database.max_connections", 5)?
        .set_default("database.create_if_missing", true)?
        .set_default("database.create_schema", false)?
        .set_default("api.validate_on_create", false)?
        .set_default("api.strict_errors", false)
}

fn app_environment() -> Environment {
    Environment::with_prefix("app")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
