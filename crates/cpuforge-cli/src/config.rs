//! Configuration file discovery for the CLI.
//!
//! A TOML file is looked up in three places, first match wins:
//!
//! 1. the `--config` path, which must exist;
//! 2. `cpuforge/config.toml` under the working directory;
//! 3. `config.toml` in the platform configuration directory.
//!
//! With no file anywhere the built-in defaults are used.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use cpuforge::{DesignError, config::AppConfig};

const LOCAL_CONFIG: &str = "cpuforge/config.toml";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for DesignError {
    fn from(err: ConfigError) -> Self {
        DesignError::Io(io::Error::other(err.to_string()))
    }
}

/// Where a configuration file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    Explicit,
    Local,
    Platform,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit => write!(f, "explicit"),
            ConfigSource::Local => write!(f, "local"),
            ConfigSource::Platform => write!(f, "platform"),
        }
    }
}

/// Loads the application configuration.
///
/// # Errors
///
/// Returns an error if an explicit path does not exist, or if the selected
/// file cannot be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DesignError> {
    if let Some(path) = explicit_path {
        return read_config(path.as_ref(), ConfigSource::Explicit);
    }

    match discover() {
        Some((source, path)) => read_config(&path, source),
        None => {
            debug!("No configuration file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn discover() -> Option<(ConfigSource, PathBuf)> {
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return Some((ConfigSource::Local, local));
    }

    let Some(dirs) = ProjectDirs::from("com", "cpuforge", "cpuforge") else {
        debug!("Could not determine platform-specific config directory");
        return None;
    };
    let platform = dirs.config_dir().join(CONFIG_FILE_NAME);
    if platform.is_file() {
        Some((ConfigSource::Platform, platform))
    } else {
        debug!(path:? = platform; "Platform configuration file not found");
        None
    }
}

fn read_config(path: &Path, source: ConfigSource) -> Result<AppConfig, DesignError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    info!(path:? = path, source:% = source; "Loading configuration");
    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    Ok(config)
}
