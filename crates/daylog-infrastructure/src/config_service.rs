//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`, writing a default file
//! on first run.

use crate::storage::DocumentFile;
use daylog_core::config::RootConfig;
use daylog_core::error::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: DocumentFile<RootConfig>,
    /// Cached configuration, loaded lazily.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Service over the config file at `path` (see `DaylogPaths::config_file`).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            file: DocumentFile::new(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing file is created with defaults. A malformed file is an error
    /// and is left untouched.
    pub fn get_config(&self) -> Result<RootConfig> {
        if let Some(cached) = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self.load_config()?;

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn load_config(&self) -> Result<RootConfig> {
        match self.file.load()? {
            Some(config) => Ok(config),
            None => {
                let default_config = RootConfig::default();
                self.file.save(&default_config)?;
                tracing::info!(path = %self.file.path().display(), "created default config");
                Ok(default_config)
            }
        }
    }
}
