//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The `--data-dir` flag (or `CODEX_DATA_DIR`) is
//! resolved first because the default config file lives inside it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::llm::AnalysisConfig;
use crate::repository::util::is_postgres_url;
use crate::repository::{DbContext, DbError};
use crate::services::mqtt::{DEFAULT_BROKER_PORT, DEFAULT_BROKER_URL};

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "codex.db";

/// Config file looked up inside the data directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "codex.toml";

/// Default uploads subdirectory name.
const UPLOADS_SUBDIR: &str = "uploads";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database URL (overrides the SQLite file in `data_dir` if set).
    pub database_url: Option<String>,
    /// Directory for raw uploaded files.
    pub uploads_dir: PathBuf,
    /// Disable TLS for PostgreSQL connections.
    pub no_tls: bool,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
    /// MQTT broker host for the placeholder client.
    pub mqtt_broker_url: String,
    pub mqtt_port: u16,
    /// Analysis provider settings.
    pub analysis: AnalysisConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_data_dir(PathBuf::from("data"))
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            uploads_dir: data_dir.join(UPLOADS_SUBDIR),
            data_dir,
            database_url: None,
            no_tls: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            mqtt_broker_url: DEFAULT_BROKER_URL.to_string(),
            mqtt_port: DEFAULT_BROKER_PORT,
            analysis: AnalysisConfig::default(),
        }
    }

    /// Get the database URL, constructing from path if not explicitly set.
    pub fn database_url(&self) -> String {
        if let Some(ref url) = self.database_url {
            url.clone()
        } else {
            format!("sqlite:{}", self.database_path().display())
        }
    }

    /// Full path to the local SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_DATABASE_FILENAME)
    }

    /// Check if using PostgreSQL (vs SQLite).
    pub fn is_postgres(&self) -> bool {
        self.database_url
            .as_ref()
            .is_some_and(|url| is_postgres_url(url))
    }

    /// Ensure all directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for (label, dir) in [("data", &self.data_dir), ("uploads", &self.uploads_dir)] {
            fs::create_dir_all(dir).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create {} directory '{}': {}",
                        label,
                        dir.display(),
                        e
                    ),
                )
            })?;
        }
        Ok(())
    }

    /// Create a database context using the configured database URL or path.
    pub fn create_db_context(&self) -> Result<DbContext, DbError> {
        DbContext::from_url(&self.database_url(), self.no_tls)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
        self.analysis = self.analysis.clone().with_env_overrides();
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL").or_else(|| get("SUPABASE_DB_URL")) {
            tracing::debug!("Using database URL from environment");
            self.database_url = Some(url);
        }
        if let Some(dir) = get("CODEX_UPLOADS_DIR") {
            self.uploads_dir = expand_path(&dir);
        }
        if let Some(val) = get("CODEX_NO_TLS") {
            self.no_tls = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Some(val) = get("CODEX_BCRYPT_COST") {
            match val.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => self.bcrypt_cost = cost,
                _ => tracing::warn!("Ignoring invalid CODEX_BCRYPT_COST={}", val),
            }
        }
        if let Some(url) = get("MQTT_BROKER_URL") {
            self.mqtt_broker_url = url;
        }
        if let Some(val) = get("MQTT_PORT") {
            match val.parse() {
                Ok(port) => self.mqtt_port = port,
                Err(_) => tracing::warn!("Ignoring invalid MQTT_PORT={}", val),
            }
        }
    }
}

/// Configuration file structure. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub data_dir: Option<String>,
    pub database_url: Option<String>,
    pub uploads_dir: Option<String>,
    pub no_tls: Option<bool>,
    pub bcrypt_cost: Option<u32>,
    #[serde(default)]
    pub mqtt: MqttSection,
    pub analysis: Option<AnalysisConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MqttSection {
    pub broker_url: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply configuration to settings.
    /// `base_dir` is used to resolve relative paths (the config file's directory).
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = resolve_path(data_dir, base_dir);
            settings.uploads_dir = settings.data_dir.join(UPLOADS_SUBDIR);
        }
        if let Some(ref uploads_dir) = self.uploads_dir {
            settings.uploads_dir = resolve_path(uploads_dir, base_dir);
        }
        if let Some(ref url) = self.database_url {
            settings.database_url = Some(url.clone());
        }
        if let Some(no_tls) = self.no_tls {
            settings.no_tls = no_tls;
        }
        if let Some(cost) = self.bcrypt_cost {
            settings.bcrypt_cost = cost;
        }
        if let Some(ref broker) = self.mqtt.broker_url {
            settings.mqtt_broker_url = broker.clone();
        }
        if let Some(port) = self.mqtt.port {
            settings.mqtt_port = port;
        }
        if let Some(ref analysis) = self.analysis {
            settings.analysis = analysis.clone();
        }
    }
}

/// Expand `~` in a path.
fn expand_path(path_str: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path_str).as_ref())
}

/// Resolve a path that may be relative to the config file.
/// - Absolute paths are returned as-is
/// - Paths starting with ~ are expanded
/// - Relative paths are resolved relative to `base_dir`
fn resolve_path(path_str: &str, base_dir: &Path) -> PathBuf {
    let path = expand_path(path_str);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

/// Options for loading settings, usually from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Data directory override.
    pub data_dir: Option<PathBuf>,
    /// Explicit config file path.
    pub config: Option<PathBuf>,
}

/// Load settings: defaults → config file → environment.
pub fn load_settings(options: &LoadOptions) -> Result<Settings, ConfigError> {
    let data_dir_override = options.data_dir.as_ref().map(|d| expand_path(&d.to_string_lossy()));
    let mut settings = match data_dir_override {
        Some(ref dir) => Settings::with_data_dir(dir.clone()),
        None => Settings::default(),
    };

    let config_path = options.config.clone().or_else(|| {
        let candidate = settings.data_dir.join(DEFAULT_CONFIG_FILENAME);
        candidate.exists().then_some(candidate)
    });

    if let Some(path) = config_path {
        tracing::debug!("Loading config from {}", path.display());
        let config = Config::load_from_path(&path)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.apply_to_settings(&mut settings, &base_dir);

        // --data-dir takes precedence over the file
        if let Some(dir) = data_dir_override {
            if config.uploads_dir.is_none() {
                settings.uploads_dir = dir.join(UPLOADS_SUBDIR);
            }
            settings.data_dir = dir;
        }
    }

    settings.apply_env();
    Ok(settings)
}
