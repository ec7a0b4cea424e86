//! TOML file-based DocumentStore implementation.

use crate::storage::DocumentFile;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use daylog_core::entry::{DocumentStore, Entry, EntryQuery, NewEntry};
use daylog_core::error::{DaylogError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One collection file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionDocument {
    #[serde(rename = "entry", default)]
    entries: Vec<EntryRecord>,
}

/// On-disk shape of an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRecord {
    id: String,
    uid: String,
    date: String,
    text: String,
    created_at: String,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            uid: entry.owner.clone(),
            date: entry.date.clone(),
            text: entry.text.clone(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<EntryRecord> for Entry {
    type Error = DaylogError;

    fn try_from(record: EntryRecord) -> Result<Self> {
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .map_err(|e| DaylogError::Serialization {
                format: "RFC 3339".to_string(),
                message: format!("entry '{}' has a bad created_at: {}", record.id, e),
            })?
            .with_timezone(&Utc);

        Ok(Entry {
            id: record.id,
            owner: record.uid,
            date: record.date,
            text: record.text,
            created_at,
        })
    }
}

/// Document store keeping each collection in `<base_dir>/<collection>.toml`.
///
/// File layout:
/// ```toml
/// [[entry]]
/// id = "9b2d..."
/// uid = "local"
/// date = "2024-01-02"
/// text = "Started project X"
/// created_at = "2024-01-02T08:15:00+00:00"
/// ```
///
/// Records are kept in insertion order, which is the native order for ties
/// when a query sorts.
#[derive(Debug, Clone)]
pub struct TomlEntryStore {
    base_dir: PathBuf,
}

impl TomlEntryStore {
    /// Creates a store rooted at `base_dir` (created on first write).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn collection_file(&self, collection: &str) -> Result<DocumentFile<CollectionDocument>> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DaylogError::data_access(format!(
                "Invalid collection name '{collection}'"
            )));
        }

        Ok(DocumentFile::new(self.base_dir.join(format!("{collection}.toml"))))
    }
}

#[async_trait]
impl DocumentStore for TomlEntryStore {
    async fn query(&self, collection: &str, query: &EntryQuery) -> Result<Vec<Entry>> {
        let file = self.collection_file(collection)?;

        let document = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| DaylogError::internal(format!("Storage task failed: {e}")))??
            .unwrap_or_default();

        let entries = document
            .entries
            .into_iter()
            .map(Entry::try_from)
            .collect::<Result<Vec<_>>>()?;

        let result = query.apply(entries);
        tracing::debug!(
            collection,
            owner = %query.owner,
            count = result.len(),
            "query executed"
        );
        Ok(result)
    }

    async fn insert(&self, collection: &str, entry: NewEntry) -> Result<String> {
        let file = self.collection_file(collection)?;
        let entry = entry.into_entry(Uuid::new_v4().to_string(), Utc::now());
        let record = EntryRecord::from(&entry);

        tokio::task::spawn_blocking(move || {
            file.update(CollectionDocument::default, |document| {
                document.entries.push(record)
            })
        })
        .await
        .map_err(|e| DaylogError::internal(format!("Storage task failed: {e}")))??;

        tracing::debug!(collection, id = %entry.id, owner = %entry.owner, "entry inserted");
        Ok(entry.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TomlEntryStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlEntryStore::new(temp_dir.path());
        (store, temp_dir)
    }

    fn new_entry(owner: &str, date: &str, text: &str) -> NewEntry {
        NewEntry {
            owner: owner.to_string(),
            date: date.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_query_missing_collection_is_empty() {
        let (store, _temp_dir) = create_test_store();

        let entries = store
            .query("entries", &EntryQuery::owned_by("u1"))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let (store, _temp_dir) = create_test_store();
        let before = Utc::now();

        let id = store
            .insert("entries", new_entry("u1", "2024-01-01", "hello"))
            .await
            .unwrap();

        let entries = store
            .query("entries", &EntryQuery::owned_by("u1"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].owner, "u1");
        assert_eq!(entries[0].text, "hello");
        assert!(entries[0].created_at >= before - chrono::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_query_scopes_by_owner_and_orders_by_date_desc() {
        let (store, _temp_dir) = create_test_store();

        // Inserted out of date order
        store.insert("entries", new_entry("u1", "2024-01-01", "a")).await.unwrap();
        store.insert("entries", new_entry("u2", "2024-06-01", "other")).await.unwrap();
        store.insert("entries", new_entry("u1", "2024-01-02", "b")).await.unwrap();

        let entries = store
            .query("entries", &EntryQuery::owned_by("u1"))
            .await
            .unwrap();

        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-01"]);
        assert!(entries.iter().all(|e| e.owner == "u1"));
    }

    #[tokio::test]
    async fn test_collections_are_separate_files() {
        let (store, temp_dir) = create_test_store();

        store.insert("entries", new_entry("u1", "2024-01-01", "a")).await.unwrap();
        store.insert("archive", new_entry("u1", "2023-01-01", "old")).await.unwrap();

        assert!(temp_dir.path().join("entries.toml").exists());
        assert!(temp_dir.path().join("archive.toml").exists());

        let entries = store
            .query("entries", &EntryQuery::owned_by("u1"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_collection_name_rejected() {
        let (store, _temp_dir) = create_test_store();

        let err = store
            .query("../escape", &EntryQuery::owned_by("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DaylogError::DataAccess(_)));
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_is_reported() {
        let (store, temp_dir) = create_test_store();
        std::fs::write(
            temp_dir.path().join("entries.toml"),
            r#"
[[entry]]
id = "e1"
uid = "u1"
date = "2024-01-01"
text = "x"
created_at = "yesterday"
"#,
        )
        .unwrap();

        let err = store
            .query("entries", &EntryQuery::owned_by("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DaylogError::Serialization { .. }));
    }
}
