//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Attachment storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Default marginal rates for the indirect-cost calculator.
    #[serde(default)]
    pub calculator: CalculatorConfig,
    /// Activity log defaults.
    #[serde(default)]
    pub operator: OperatorConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://fundtrack.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

/// Where attachments (vouchers, documents, outcome files) live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Root folder on the local filesystem.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Upper bound for a single upload in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_storage_root() -> String {
    "./data".to_string()
}

fn default_max_file_size() -> u64 {
    20 * 1024 * 1024 // 20 MiB
}

/// Marginal indirect-cost rates, in percent.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorConfig {
    /// Rate for direct costs up to 500 wan.
    #[serde(default = "default_rate1")]
    pub rate1: u8,
    /// Rate for direct costs between 500 and 1000 wan.
    #[serde(default = "default_rate2")]
    pub rate2: u8,
    /// Rate for direct costs above 1000 wan.
    #[serde(default = "default_rate3")]
    pub rate3: u8,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            rate1: default_rate1(),
            rate2: default_rate2(),
            rate3: default_rate3(),
        }
    }
}

fn default_rate1() -> u8 {
    20
}

fn default_rate2() -> u8 {
    15
}

fn default_rate3() -> u8 {
    13
}

/// Activity log settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OperatorConfig {
    /// Operator recorded when a request does not name one.
    #[serde(default = "default_operator")]
    pub default_name: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            default_name: default_operator(),
        }
    }
}

fn default_operator() -> String {
    "system".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FUNDTRACK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "FUNDTRACK__SERVER__PORT",
                "FUNDTRACK__DATABASE__URL",
                "RUN_MODE",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.database.url, "sqlite://fundtrack.db?mode=rwc");
                assert_eq!(config.calculator.rate1, 20);
                assert_eq!(config.calculator.rate2, 15);
                assert_eq!(config.calculator.rate3, 13);
                assert_eq!(config.operator.default_name, "system");
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("FUNDTRACK__SERVER__PORT", Some("9001")),
                ("FUNDTRACK__DATABASE__URL", Some("sqlite::memory:")),
                ("FUNDTRACK__STORAGE__MAX_FILE_SIZE", Some("1024")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9001);
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.storage.max_file_size, 1024);
            },
        );
    }
}
