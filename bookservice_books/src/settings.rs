use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::books_repository::PostgresBooksRepositoryConfig;

const CONFIG_FILE: &str = "bookservice_books";
const ENV_PREFIX: &str = "BOOKSERVICE";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub hostname: String,
    pub username: String,
    pub password: String,
    pub dbname: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TelemetrySettings {
    pub jaeger_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub telemetry: TelemetrySettings,
    pub use_in_memory_db: bool,
}

impl Settings {
    /// Layers defaults, optional `bookservice_books.toml` and `BOOKSERVICE__*` variables.
    /// Older deployments set `USE_IN_MEMORY_DB` and `DB_*` variables, those win over everything else.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).separator("__")),
            |name| std::env::var(name).ok(),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        legacy_var: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let use_in_memory_db = legacy_var("USE_IN_MEMORY_DB")
            .map(|value| value.to_lowercase() == "true");

        let config = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.hostname", "127.0.0.1")?
            .set_default("database.username", "postgres")?
            .set_default("database.password", "postgres")?
            .set_default("database.dbname", "postgres")?
            .set_default("telemetry.jaeger_enabled", true)?
            .set_default("use_in_memory_db", false)?
            .set_override_option("use_in_memory_db", use_in_memory_db)?
            .set_override_option("database.hostname", legacy_var("DB_HOST"))?
            .set_override_option("database.username", legacy_var("DB_USERNAME"))?
            .set_override_option("database.password", legacy_var("DB_PASSWORD"))?
            .set_override_option("database.dbname", legacy_var("DB_NAME"))?
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn postgres_config(&self) -> PostgresBooksRepositoryConfig {
        PostgresBooksRepositoryConfig {
            hostname: self.database.hostname.clone(),
            username: self.database.username.clone(),
            password: self.database.password.clone(),
            dbname: self.database.dbname.clone(),
        }
    }
}
