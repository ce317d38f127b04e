//! Configuration loading and typed config structures for the FlixFlux service.
//!
//! The configuration lives in `flixflux-config.yaml` next to the binary (or
//! at the path in `FLIXFLUX_CONFIG`). Every field has a default, so an
//! absent or empty file yields a working in-memory demo.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Titles inserted by the seeder when the config does not list any.
pub const DEFAULT_SEED_TITLES: [&str; 5] = [
    "Silence of the Lambdas",
    "AEon Flux",
    "Enter the Mono<Void>",
    "Back to the Future",
    "Meet the Fluxxes",
];

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong with the value.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `flixflux-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FlixFluxConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Movie store backend selection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Event stream timing.
    #[serde(default)]
    pub stream: StreamConfig,

    /// Startup reseed behaviour.
    #[serde(default)]
    pub seed: SeedConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FlixFluxConfig {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// - `DATABASE_URL` sets `store.postgres_url` and selects the postgres backend
    /// - `PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// Environment variables are not consulted.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up through `lookup` (normally the process
    /// environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.store.backend = StoreBackend::Postgres;
            self.store.postgres_url = Some(url);
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("PORT={port}: {e}"),
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.stream.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("stream.tick_interval_ms must be at least 1"),
            });
        }
        if self.store.backend == StoreBackend::Postgres && self.store.postgres_url.is_none() {
            return Err(ConfigError::Invalid {
                reason: String::from("store.backend is postgres but no postgres_url is set"),
            });
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which movie store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store; contents vanish on restart.
    #[default]
    Memory,
    /// `PostgreSQL` document table.
    Postgres,
}

/// Movie store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Selected backend.
    #[serde(default)]
    pub backend: StoreBackend,

    /// `PostgreSQL` URL, required for the postgres backend.
    #[serde(default)]
    pub postgres_url: Option<String>,

    /// Pool size for the postgres backend.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Milliseconds to wait for a pooled connection before a query fails.
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

impl StoreConfig {
    /// The pool acquire timeout as a [`Duration`].
    pub const fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            postgres_url: None,
            max_connections: default_max_connections(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
        }
    }
}

/// Event stream timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamConfig {
    /// Milliseconds between events on a movie's stream.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl StreamConfig {
    /// The tick period as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Startup reseed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedConfig {
    /// Wipe and repopulate the store at startup.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Titles to insert, in order.
    #[serde(default = "default_seed_titles")]
    pub titles: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            titles: default_seed_titles(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_acquire_timeout_ms() -> u64 {
    5000
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_true() -> bool {
    true
}

fn default_seed_titles() -> Vec<String> {
    DEFAULT_SEED_TITLES.iter().map(|t| (*t).to_owned()).collect()
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = FlixFluxConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.stream.tick_interval(), Duration::from_secs(1));
        assert!(config.seed.enabled);
        assert_eq!(config.seed.titles.len(), 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 9000
store:
  backend: postgres
  postgres_url: "postgresql://u:p@localhost/flix"
  max_connections: 3
  acquire_timeout_ms: 750
stream:
  tick_interval_ms: 250
seed:
  enabled: false
  titles: ["Only One"]
logging:
  level: debug
"#;
        let config = FlixFluxConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.max_connections, 3);
        assert_eq!(config.store.acquire_timeout(), Duration::from_millis(750));
        assert_eq!(config.stream.tick_interval_ms, 250);
        assert!(!config.seed.enabled);
        assert_eq!(config.seed.titles, vec![String::from("Only One")]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = FlixFluxConfig::parse("server:\n  port: 7000\n");
        let config = config.ok().unwrap_or_default();

        // Port is overridden
        assert_eq!(config.server.port, 7000);
        // Everything else uses defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.stream.tick_interval_ms, 1000);
        assert_eq!(config.store.acquire_timeout_ms, 5000);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = FlixFluxConfig::parse("");
        assert_eq!(config.ok(), Some(FlixFluxConfig::default()));
    }

    #[test]
    fn zero_tick_interval_rejected() {
        let config = FlixFluxConfig::parse("stream:\n  tick_interval_ms: 0\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn postgres_without_url_rejected() {
        let config = FlixFluxConfig::parse("store:\n  backend: postgres\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn database_url_selects_postgres() {
        let mut config = FlixFluxConfig::default();
        let result = config.apply_overrides(lookup_from(&[("DATABASE_URL", "postgresql://x/y")]));
        assert!(result.is_ok());
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.postgres_url.as_deref(), Some("postgresql://x/y"));
    }

    #[test]
    fn port_override() {
        let mut config = FlixFluxConfig::default();
        assert!(config.apply_overrides(lookup_from(&[("PORT", "3000")])).is_ok());
        assert_eq!(config.server.port, 3000);

        let bad = config.apply_overrides(lookup_from(&[("PORT", "not-a-port")]));
        assert!(matches!(bad, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("flixflux-config.yaml");
        if path.exists() {
            let config = FlixFluxConfig::parse(&std::fs::read_to_string(&path).unwrap_or_default());
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
