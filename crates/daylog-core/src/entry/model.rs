//! Entry domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One journal record as held by the store.
///
/// `id` and `created_at` are assigned by the store; everything else comes
/// from the composer at save time. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned opaque identifier
    pub id: String,
    /// uid of the identity that wrote the entry
    pub owner: String,
    /// Calendar date chosen by the user (`YYYY-MM-DD`)
    pub date: String,
    /// Trimmed, non-empty body
    pub text: String,
    /// Store-assigned creation timestamp
    pub created_at: DateTime<Utc>,
}

/// The fields a writer supplies for a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub owner: String,
    pub date: String,
    pub text: String,
}

impl NewEntry {
    /// Completes the record with the store-assigned fields.
    pub fn into_entry(self, id: impl Into<String>, created_at: DateTime<Utc>) -> Entry {
        Entry {
            id: id.into(),
            owner: self.owner,
            date: self.date,
            text: self.text,
            created_at,
        }
    }
}
