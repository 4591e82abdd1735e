use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Plain environment variables the deployment sets. They win over the config
/// file and over the prefixed `RECORDBOX_*` variables.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_SSLMODE", "database.ssl_mode"),
];

const DEFAULT_CONFIG_FILE: &str = "recordbox.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub statement_timeout_secs: u64,
    pub create_schema: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 << 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads defaults, then the TOML file, then `RECORDBOX_*` variables, then
    /// `PORT`/`DB_*`. An explicit `config_path` must exist; the default
    /// `recordbox.toml` is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| env::var(key).ok())
    }

    pub fn load_with<F>(config_path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = ConfigBuilder::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.name", "postgres")?
            .set_default("database.ssl_mode", "disable")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 10)?
            .set_default("database.statement_timeout_secs", 30)?
            .set_default("database.create_schema", false)?
            .set_default("limits.max_upload_bytes", 10_i64 << 20)?
            .set_default("logging.level", "info")?;

        let settings = match config_path {
            Some(path) => settings.add_source(File::from(path).required(true)),
            None => settings.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let mut settings = settings.add_source(
            Environment::with_prefix("RECORDBOX")
                .prefix_separator("_")
                .separator("__"),
        );

        for (var, key) in ENV_OVERRIDES {
            let value = lookup(var).filter(|v| !v.is_empty());
            settings = settings.set_override_option(*key, value)?;
        }

        let config: Config = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.database.ssl_mode()?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.limits.max_upload_bytes == 0 {
            return Err(ConfigError::Message(
                "limits.max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn ssl_mode(&self) -> Result<PgSslMode, ConfigError> {
        PgSslMode::from_str(&self.ssl_mode).map_err(|_| {
            ConfigError::Message(format!("Unsupported database.ssl_mode: {}", self.ssl_mode))
        })
    }

    /// libpq-style key/value string with the password masked, for logs.
    pub fn redacted_connection_string(&self) -> String {
        let password = if self.password.is_empty() { "" } else { "***" };
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            self.host, self.port, self.user, password, self.name, self.ssl_mode
        )
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name)
            .ssl_mode(self.ssl_mode()?)
            .options([(
                "statement_timeout",
                format!("{}s", self.statement_timeout_secs),
            )]);

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        Ok(options)
    }
}
