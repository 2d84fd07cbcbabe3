//! Config file location and persistence.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{info, warn};

use super::app_config::AppConfig;

const APP_QUALIFIER: &str = "org";
const APP_ORGANIZATION: &str = "maktab";
const APP_NAME: &str = "photo-gallery";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Failure to locate, read or write the config file.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("no home directory to place the config file in")]
    ConfigDirNotFound,
    #[error("config file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize config: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Reads the TOML config file, writing a default one on first run.
#[derive(Debug, Clone)]
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory for this application.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the platform has no config directory.
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::with_dir(dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Uses `config_dir` instead of the platform directory.
    #[must_use]
    pub const fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Path of the config file, honouring an explicit `--config` path.
    #[must_use]
    pub fn config_path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.config_dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Loads the config file.
    ///
    /// A missing file is created with defaults. A file that is not valid TOML
    /// is left untouched and defaults are used for this run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read, or the
    /// default file cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = self.config_path(path_override);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Config file is malformed, using defaults");
                AppConfig::default()
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file, writing defaults");
                let config = AppConfig::default();
                Self::write_atomically(&path, &config)?;
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces `path` through a temp file in the same directory, so readers
    /// never see a half-written config.
    fn write_atomically(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(content.as_bytes())?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
