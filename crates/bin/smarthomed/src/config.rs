//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `smarthome.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use smarthome_app::ports::SeedOptions;
use smarthome_domain::id::DeviceId;

/// Environment name that makes `migrate` drop the schema before seeding.
const DEVELOPMENT: &str = "development";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment environment (`production`, `development`, …).
    pub environment: String,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Storage backend settings.
    pub storage: StorageConfig,
    /// Skill token settings.
    pub auth: AuthConfig,
    /// Default device settings.
    pub device: DeviceConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Storage backend configuration.
///
/// When `state_file_path` is set the single-file backend is used and
/// `database_url` is ignored.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `SQLite` connection URL or file path.
    pub database_url: String,
    /// Path of the JSON state file.
    pub state_file_path: Option<PathBuf>,
}

/// Shared-secret configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Expected `X-Skill-Token` value. Device routes answer 500 while unset.
    pub skill_token: Option<String>,
}

/// Default device configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device addressed by `/devices/state` and `/devices/toggle`.
    pub default_id: DeviceId,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Storage backend selected by the configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum Backend<'a> {
    /// `SQLite` database at the given URL.
    Sqlite(&'a str),
    /// JSON state file at the given path.
    File(&'a Path),
}

impl Config {
    /// Load configuration from `smarthome.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("smarthome.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("SMARTHOME_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("SMARTHOME_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("SMARTHOME_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("SMARTHOME_DATABASE_URL") {
            self.storage.database_url = val;
        }
        if let Some(val) = var("STATE_FILE_PATH") {
            self.storage.state_file_path = (!val.is_empty()).then(|| PathBuf::from(val));
        }
        if let Some(val) = var("ALEXA_SKILL_TOKEN") {
            self.auth.skill_token = Some(val);
        }
        if let Some(val) = var("SMARTHOME_DEFAULT_DEVICE_ID") {
            self.device.default_id = DeviceId::from_str(&val).map_err(|_| {
                ConfigError::Validation(format!("invalid default device id: {val}"))
            })?;
        }
        if let Some(val) = var("ENV") {
            self.environment = val;
        }
        if let Some(val) = var("SMARTHOME_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.backend() == Backend::Sqlite("") {
            return Err(ConfigError::Validation(
                "database url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the configured storage backend.
    #[must_use]
    pub fn backend(&self) -> Backend<'_> {
        match &self.storage.state_file_path {
            Some(path) => Backend::File(path),
            None => Backend::Sqlite(&self.storage.database_url),
        }
    }

    /// Whether the deployment is a development environment.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case(DEVELOPMENT)
    }

    /// Whether `migrate` drops the schema first: on explicit request, or
    /// always in a development environment.
    #[must_use]
    pub fn migrate_resets(&self, requested: bool) -> bool {
        requested || self.is_development()
    }

    /// Seeding options derived from the default device.
    #[must_use]
    pub fn seed_options(&self) -> SeedOptions {
        SeedOptions {
            default_device: Some(self.device.default_id),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:smarthome.db".to_string(),
            state_file_path: None,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            default_id: DeviceId::from_uuid(uuid::Uuid::from_u128(1)),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smarthomed=info,smarthome=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.backend(), Backend::Sqlite("sqlite:smarthome.db"));
        assert!(config.auth.skill_token.is_none());
        assert!(!config.is_development());
        assert_eq!(
            config.device.default_id.to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            environment = 'development'

            [server]
            host = '127.0.0.1'
            port = 9090

            [storage]
            database_url = 'sqlite:test.db'
            state_file_path = '/tmp/state.json'

            [auth]
            skill_token = 'secret'

            [device]
            default_id = '7a1d2f4e-0c1b-4f7e-9a59-3f1c2b7d8e90'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.is_development());
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.storage.database_url, "sqlite:test.db");
        assert_eq!(config.backend(), Backend::File(Path::new("/tmp/state.json")));
        assert_eq!(config.auth.skill_token.as_deref(), Some("secret"));
        assert_eq!(
            config.device.default_id.to_string(),
            "7a1d2f4e-0c1b-4f7e-9a59-3f1c2b7d8e90"
        );
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_database_url() {
        let mut config = Config::default();
        config.storage.database_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_empty_database_url_with_state_file() {
        let mut config = Config::default();
        config.storage.database_url = String::new();
        config.storage.state_file_path = Some(PathBuf::from("state.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("SMARTHOME_BIND", "127.0.0.1:8081"),
                ("STATE_FILE_PATH", "/var/lib/smarthome/state.json"),
                ("ALEXA_SKILL_TOKEN", "from-env"),
                ("ENV", "Development"),
                ("RUST_LOG", "trace"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8081");
        assert_eq!(
            config.backend(),
            Backend::File(Path::new("/var/lib/smarthome/state.json"))
        );
        assert_eq!(config.auth.skill_token.as_deref(), Some("from-env"));
        assert!(config.is_development());
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_reset_on_migrate_only_when_requested_in_production() {
        let config = Config::default();
        assert!(!config.migrate_resets(false));
        assert!(config.migrate_resets(true));
    }

    #[test]
    fn should_always_reset_on_migrate_in_development() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("ENV", "development")])).unwrap();
        assert!(config.migrate_resets(false));
        assert!(config.migrate_resets(true));
    }

    #[test]
    fn should_prefer_rust_log_over_smarthome_log() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("SMARTHOME_LOG", "warn"), ("RUST_LOG", "debug")]))
            .unwrap();
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_treat_empty_state_file_path_as_unset() {
        let mut config = Config::default();
        config.storage.state_file_path = Some(PathBuf::from("state.json"));
        config
            .apply_overrides(env(&[("STATE_FILE_PATH", "")]))
            .unwrap();
        assert_eq!(config.backend(), Backend::Sqlite("sqlite:smarthome.db"));
    }

    #[test]
    fn should_ignore_unparseable_port_override() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("SMARTHOME_PORT", "http")]))
            .unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_invalid_default_device_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("SMARTHOME_DEFAULT_DEVICE_ID", "kitchen")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_seed_default_device() {
        let config = Config::default();
        assert_eq!(
            config.seed_options().default_device,
            Some(config.device.default_id)
        );
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
