//! Storage layer for atomic file operations.

mod document_file;

pub use document_file::{DocumentFile, DocumentFileError};
