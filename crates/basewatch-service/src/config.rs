//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use basewatch_core::{DEFAULT_ZONE_RADIUS, InsightThresholds, LocationStore, ZoneGrid};

/// Server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Zone keying and insight settings.
    pub tracking: TrackingConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return every problem found.
    ///
    /// # Example
    ///
    /// ```
    /// use basewatch_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.storage.validate());
        errors.extend(self.tracking.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.bind.is_empty() {
            errors.push(FieldError::new("server.bind", "bind address cannot be empty"));
            return errors;
        }

        match self.bind.rsplit_once(':') {
            None => errors.push(FieldError::new(
                "server.bind",
                format!(
                    "invalid bind address '{}': expected format 'host:port'",
                    self.bind
                ),
            )),
            Some((_, port)) => match port.parse::<u16>() {
                Ok(0) => errors.push(FieldError::new("server.bind", "port cannot be 0")),
                Err(_) => errors.push(FieldError::new(
                    "server.bind",
                    format!("invalid port '{}': must be a number 1-65535", port),
                )),
                Ok(_) => {}
            },
        }

        errors
    }

    /// Resolve `bind` to a socket address, looking up host names such as
    /// `localhost`.
    pub async fn resolve(&self) -> std::io::Result<SocketAddr> {
        tokio::net::lookup_host(self.bind.as_str())
            .await?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    format!("bind address '{}' resolved to no addresses", self.bind),
                )
            })
    }
}

/// Which [`StorageBackend`](basewatch_core::StorageBackend) to persist with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// A single JSON document.
    #[default]
    Json,
    /// A SQLite database.
    Sqlite,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend type.
    pub backend: StorageKind,
    /// Store file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageKind::Json,
            path: basewatch_store::default_store_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.path.as_os_str().is_empty() {
            errors.push(FieldError::new("storage.path", "store path cannot be empty"));
        }

        errors
    }

    /// Open the configured store.
    ///
    /// A JSON store never fails to open; unreadable contents are logged and
    /// the store starts empty. A SQLite store fails if the database cannot be
    /// opened or initialized.
    pub fn open(&self) -> basewatch_store::Result<LocationStore> {
        match self.backend {
            StorageKind::Json => Ok(LocationStore::open_json(&self.path)),
            StorageKind::Sqlite => LocationStore::open_sqlite(&self.path),
        }
    }
}

/// Zone keying and insight settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Zone cell size in degrees, used when requests carry raw coordinates.
    pub zone_radius: f64,
    /// Insight rule limits.
    pub thresholds: InsightThresholds,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            zone_radius: DEFAULT_ZONE_RADIUS,
            thresholds: InsightThresholds::default(),
        }
    }
}

impl TrackingConfig {
    /// Validate tracking configuration.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if let Err(e) = ZoneGrid::new(self.zone_radius) {
            errors.push(FieldError::new("tracking.zone_radius", e.to_string()));
        }

        let t = &self.thresholds;
        for (field, value) in [
            ("tracking.thresholds.significant_total", t.significant_total),
            ("tracking.thresholds.stable_aircraft", t.stable_aircraft),
            ("tracking.thresholds.stable_vehicle", t.stable_vehicle),
        ] {
            if value < 0 {
                errors.push(FieldError::new(
                    field,
                    format!("threshold {} cannot be negative", value),
                ));
            }
        }

        errors
    }

    /// The zone grid described by `zone_radius`.
    pub fn zone(&self) -> Result<ZoneGrid, basewatch_types::ValidationError> {
        ZoneGrid::new(self.zone_radius)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_field_errors(.0))]
    Validation(Vec<FieldError>),
}

/// A single invalid configuration field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// The field path (e.g., `server.bind` or `tracking.zone_radius`).
    pub field: String,
    /// Description of the problem.
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("basewatch")
        .join("server.toml")
}
