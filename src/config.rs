use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".grade-manager";
/// Data file name stored inside the application data directory.
const DATA_FILE_NAME: &str = "data.txt";
/// Subfolder holding rotated log files.
const LOG_DIR_NAME: &str = "logs";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Overrides the data file location.
pub const DATA_FILE_ENV: &str = "GRADE_MANAGER_DATA";
/// Overrides the log level (`error`, `warn`, `info`, `debug`, `trace`).
pub const LOG_LEVEL_ENV: &str = "GRADE_MANAGER_LOG";

/// Startup settings, resolved once in `main.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Resolve paths under the home directory, applying environment
    /// overrides.
    pub fn from_env() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        let base = base_dirs.home_dir().join(DATA_DIR_NAME);
        Ok(Self::resolve(
            base,
            env::var_os(DATA_FILE_ENV).map(PathBuf::from),
            env::var(LOG_LEVEL_ENV).ok(),
        ))
    }

    /// Build a config rooted at `base`, with optional overrides. Split out of
    /// [`Config::from_env`] so it can be exercised without touching the real
    /// environment.
    pub fn resolve(base: PathBuf, data_file: Option<PathBuf>, log_level: Option<String>) -> Self {
        let data_file = data_file
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| base.join(DATA_FILE_NAME));
        let log_level = log_level
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        Self {
            data_file,
            log_dir: base.join(LOG_DIR_NAME),
            log_level,
        }
    }
}
