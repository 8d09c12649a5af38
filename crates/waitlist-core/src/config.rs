//! Configuration: where the waitlist files live.
//!
//! Read from `waitlist.toml` in the platform config directory unless a path
//! is given explicitly:
//! - Linux: ~/.config/waitlist/
//! - macOS: ~/Library/Application Support/com.clinic.waitlist/
//! - Windows: %APPDATA%/clinic/waitlist/config/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "clinic";
const APP_NAME: &str = "waitlist";
const CONFIG_FILENAME: &str = "waitlist.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// File locations and bootstrap settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaitlistConfig {
    /// Directory that relative file names resolve against
    pub data_dir: PathBuf,
    pub waiting_file: PathBuf,
    pub served_file: PathBuf,
    pub users_file: PathBuf,
    pub export_file: PathBuf,
    /// Password given to the `admin` account when no users file exists
    pub bootstrap_admin_password: String,
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            waiting_file: PathBuf::from("data_espera.csv"),
            served_file: PathBuf::from("data_atendidos.csv"),
            users_file: PathBuf::from("usuarios.json"),
            export_file: PathBuf::from("lista_reabilitacao.xlsx"),
            bootstrap_admin_password: "admin123".to_string(),
        }
    }
}

/// Default config file location, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl WaitlistConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                Some(path) => {
                    tracing::debug!(path = %path.display(), "No config file, using defaults");
                    Ok(Self::default())
                }
                None => {
                    tracing::warn!("Could not determine config directory, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn waiting_path(&self) -> PathBuf {
        self.resolve(&self.waiting_file)
    }

    pub fn served_path(&self) -> PathBuf {
        self.resolve(&self.served_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.resolve(&self.users_file)
    }

    pub fn export_path(&self) -> PathBuf {
        self.resolve(&self.export_file)
    }
}
