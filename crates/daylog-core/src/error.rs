//! Error types for dayLog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a composer draft cannot be saved.
///
/// These are raised before any collaborator is contacted and are meant to be
/// shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// No date was picked
    #[error("Please pick a date for this entry.")]
    MissingDate,

    /// The date is not a `YYYY-MM-DD` calendar date
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD).")]
    InvalidDate(String),

    /// The text is empty after trimming
    #[error("Please write something before saving.")]
    EmptyText,
}

/// A shared error type for the entire dayLog workspace.
///
/// The first four variants are the user-facing failure kinds of the journal
/// flow; the rest come from the storage layer.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DaylogError {
    /// Sign-in or sign-out round trip failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Entries query failed
    #[error("Failed to load entries: {0}")]
    Fetch(String),

    /// Entry insert failed
    #[error("Failed to save entry: {0}")]
    Write(String),

    /// Draft rejected before reaching the store
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An action that needs an identity was attempted while signed out
    #[error("Not signed in")]
    NotSignedIn,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (store layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DaylogError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    /// Creates a Write error
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the message is meant for the user rather than the log file.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotSignedIn)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DaylogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DaylogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DaylogError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DaylogError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DaylogError>`.
pub type Result<T> = std::result::Result<T, DaylogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_transparently() {
        let err: DaylogError = ValidationError::EmptyText.into();
        assert!(err.is_validation());
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "Please write something before saving.");
    }

    #[test]
    fn test_io_error_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = DaylogError::from(io);
        match err {
            DaylogError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collaborator_errors_are_not_user_facing() {
        assert!(!DaylogError::fetch("timeout").is_user_facing());
        assert!(DaylogError::write("denied").is_write());
        assert!(DaylogError::auth("popup closed").is_auth());
    }
}
