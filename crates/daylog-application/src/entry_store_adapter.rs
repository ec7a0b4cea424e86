//! Entry store adapter.
//!
//! Issues the journal's two store calls, scoped to an identity, and maps
//! store failures onto the journal's error kinds.

use daylog_core::composer::EntryDraft;
use daylog_core::entry::{DocumentStore, ENTRIES_COLLECTION, Entry, EntryQuery, NewEntry};
use daylog_core::error::{DaylogError, Result};
use daylog_core::identity::Identity;
use std::sync::Arc;

#[derive(Clone)]
pub struct EntryStoreAdapter {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl EntryStoreAdapter {
    /// Adapter over the default `entries` collection.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_collection(store, ENTRIES_COLLECTION)
    }

    pub fn with_collection(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// All entries owned by `identity`, most recent date first.
    ///
    /// # Errors
    ///
    /// Any store failure is reported as `DaylogError::Fetch`.
    pub async fn fetch_entries(&self, identity: &Identity) -> Result<Vec<Entry>> {
        let query = EntryQuery::owned_by(&identity.uid);
        let entries = self
            .store
            .query(&self.collection, &query)
            .await
            .map_err(|e| match e {
                DaylogError::Fetch(_) => e,
                other => DaylogError::fetch(other.to_string()),
            })?;

        tracing::debug!(uid = %identity.uid, count = entries.len(), "entries fetched");
        Ok(entries)
    }

    /// Writes a validated draft as a new entry owned by `identity`.
    ///
    /// The store's response is not returned; callers re-fetch instead.
    ///
    /// # Errors
    ///
    /// Any store failure is reported as `DaylogError::Write`.
    pub async fn append_entry(&self, identity: &Identity, draft: &EntryDraft) -> Result<()> {
        let new_entry = NewEntry {
            owner: identity.uid.clone(),
            date: draft.date().to_string(),
            text: draft.text().to_string(),
        };

        let id = self
            .store
            .insert(&self.collection, new_entry)
            .await
            .map_err(|e| match e {
                DaylogError::Write(_) => e,
                other => DaylogError::write(other.to_string()),
            })?;

        tracing::info!(uid = %identity.uid, id = %id, date = draft.date(), "entry written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use daylog_core::composer::Composer;
    use daylog_core::entry::{EntryField, SortDirection};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        queries: Mutex<Vec<(String, EntryQuery)>>,
        inserts: Mutex<Vec<(String, NewEntry)>>,
        broken: bool,
    }

    #[async_trait]
    impl DocumentStore for RecordingStore {
        async fn query(&self, collection: &str, query: &EntryQuery) -> Result<Vec<Entry>> {
            self.queries
                .lock()
                .unwrap()
                .push((collection.to_string(), query.clone()));
            if self.broken {
                return Err(DaylogError::data_access("permission denied"));
            }
            Ok(Vec::new())
        }

        async fn insert(&self, collection: &str, entry: NewEntry) -> Result<String> {
            if self.broken {
                return Err(DaylogError::io("disk full"));
            }
            self.inserts
                .lock()
                .unwrap()
                .push((collection.to_string(), entry));
            Ok("id-1".to_string())
        }
    }

    fn draft(date: &str, text: &str) -> EntryDraft {
        let mut composer = Composer::new();
        composer.open();
        composer.set_date(date);
        composer.set_text(text);
        composer.validate().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_queries_owner_by_date_descending() {
        let store = Arc::new(RecordingStore::default());
        let adapter = EntryStoreAdapter::new(store.clone());

        let entries = adapter
            .fetch_entries(&Identity::new("u1", "Ada"))
            .await
            .unwrap();

        assert!(entries.is_empty());
        let queries = store.queries.lock().unwrap();
        let (collection, query) = &queries[0];
        assert_eq!(collection, "entries");
        assert_eq!(query.owner, "u1");
        assert_eq!(query.order_by, EntryField::Date);
        assert_eq!(query.direction, SortDirection::Descending);
    }

    #[tokio::test]
    async fn test_append_writes_owner_and_trimmed_text() {
        let store = Arc::new(RecordingStore::default());
        let adapter = EntryStoreAdapter::with_collection(store.clone(), "journal");

        adapter
            .append_entry(&Identity::new("u1", "Ada"), &draft("2024-03-01", "  hello  "))
            .await
            .unwrap();

        let inserts = store.inserts.lock().unwrap();
        assert_eq!(inserts.len(), 1);
        let (collection, entry) = &inserts[0];
        assert_eq!(collection, "journal");
        assert_eq!(entry.owner, "u1");
        assert_eq!(entry.date, "2024-03-01");
        assert_eq!(entry.text, "hello");
    }

    #[tokio::test]
    async fn test_store_failures_map_to_journal_errors() {
        let store = Arc::new(RecordingStore {
            broken: true,
            ..Default::default()
        });
        let adapter = EntryStoreAdapter::new(store);
        let identity = Identity::new("u1", "Ada");

        let fetch_err = adapter.fetch_entries(&identity).await.unwrap_err();
        assert!(fetch_err.is_fetch());
        assert!(fetch_err.to_string().contains("permission denied"));

        let write_err = adapter
            .append_entry(&identity, &draft("2024-03-01", "x"))
            .await
            .unwrap_err();
        assert!(write_err.is_write());
    }
}
