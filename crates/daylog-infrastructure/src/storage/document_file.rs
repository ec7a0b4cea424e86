//! Atomic TOML documents.
//!
//! A `DocumentFile` is one TOML file holding one serializable value. Writes
//! go to a sibling temp file, are fsynced, then renamed over the target, so a
//! reader sees either the old or the new document. Read-modify-write cycles
//! run under an exclusive `fs2` lock on `<file>.lock`.
//!
//! All methods block; async callers run them on `spawn_blocking`.

use daylog_core::DaylogError;
use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<DocumentFileError> for DaylogError {
    fn from(err: DocumentFileError) -> Self {
        match err {
            DocumentFileError::Io { .. } | DocumentFileError::Lock { .. } => {
                DaylogError::io(err.to_string())
            }
            DocumentFileError::Parse { .. } | DocumentFileError::Serialize(_) => {
                DaylogError::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Handle to a TOML document on disk.
pub struct DocumentFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for DocumentFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for DocumentFile<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFile").field("path", &self.path).finish()
    }
}

impl<T> DocumentFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Loaded and parsed
    /// - `Ok(None)`: The file is missing or blank
    /// - `Err`: Failed to read or parse
    pub fn load(&self) -> Result<Option<T>, DocumentFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| DocumentFileError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Replaces the document atomically.
    pub fn save(&self, data: &T) -> Result<(), DocumentFileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let content = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path).map_err(|source| self.io_error(source))?;
        tmp_file
            .write_all(content.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|source| self.io_error(source))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))
    }

    /// Loads (or starts from `default`), applies `f`, and saves, all under
    /// the exclusive lock. Returns what `f` returned.
    pub fn update<R>(
        &self,
        default: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, DocumentFileError> {
        let _lock = self.lock()?;

        let mut data = self.load()?.unwrap_or_else(default);
        let result = f(&mut data);
        self.save(&data)?;

        Ok(result)
    }

    /// Deletes the document. Returns whether a file was removed.
    pub fn remove(&self) -> Result<bool, DocumentFileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }

    fn lock(&self) -> Result<File, DocumentFileError> {
        let lock_path = self.path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| self.io_error(source))?;

        // Released when the handle is dropped.
        file.lock_exclusive().map_err(|source| DocumentFileError::Lock {
            path: lock_path.clone(),
            source,
        })?;

        Ok(file)
    }

    fn io_error(&self, source: std::io::Error) -> DocumentFileError {
        DocumentFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    fn counter(count: u32) -> Counter {
        Counter {
            name: "test".to_string(),
            count,
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = DocumentFile::<Counter>::new(temp_dir.path().join("counter.toml"));

        file.save(&counter(42)).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter(42)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = DocumentFile::<Counter>::new(temp_dir.path().join("missing.toml"));

        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn test_load_blank_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.toml");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(DocumentFile::<Counter>::new(path).load().unwrap(), None);
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.toml");
        fs::write(&path, "count = [not toml").unwrap();

        let err = DocumentFile::<Counter>::new(path).load().unwrap_err();
        assert!(matches!(err, DocumentFileError::Parse { .. }));
        assert!(DaylogError::from(err).to_string().contains("TOML"));
    }

    #[test]
    fn test_update_starts_from_default_and_returns_value() {
        let temp_dir = TempDir::new().unwrap();
        let file = DocumentFile::<Counter>::new(temp_dir.path().join("nested/counter.toml"));

        let first = file
            .update(|| counter(0), |c| {
                c.count += 10;
                c.count
            })
            .unwrap();
        let second = file
            .update(|| counter(0), |c| {
                c.count += 5;
                c.count
            })
            .unwrap();

        assert_eq!((first, second), (10, 15));
        assert_eq!(file.load().unwrap(), Some(counter(15)));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        let file = DocumentFile::<Counter>::new(path.clone());

        file.save(&counter(1)).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".counter.toml.tmp").exists());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let file = DocumentFile::<Counter>::new(temp_dir.path().join("counter.toml"));

        assert!(!file.remove().unwrap());
        file.save(&counter(1)).unwrap();
        assert!(file.remove().unwrap());
        assert_eq!(file.load().unwrap(), None);
    }
}
