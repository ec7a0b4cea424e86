//! Unified path management for dayLog files.
//!
//! Platform directories are resolved via `AppPaths` from the version-migrate
//! crate. A base directory override puts everything under one root.

use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolver for dayLog.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/daylog/            # Config directory
/// ├── config.toml              # Application configuration
/// ├── session.toml             # Signed-in account (local identity provider)
/// └── logs/                    # Application logs
///     └── daylog.log.YYYY-MM-DD
///
/// ~/.local/share/daylog/       # Data directory
/// └── entries.toml             # One file per collection
/// ```
#[derive(Debug, Clone, Default)]
pub struct DaylogPaths {
    base_dir: Option<PathBuf>,
}

impl DaylogPaths {
    /// Creates a resolver. `Some(base)` roots config under `base/config` and
    /// data under `base/data`.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    fn app_paths() -> AppPaths {
        AppPaths::new("daylog")
    }

    /// Returns the configuration directory (e.g. `~/.config/daylog/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.join("config")),
            None => Self::app_paths()
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/daylog/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.join("data")),
            None => Self::app_paths()
                .data_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
