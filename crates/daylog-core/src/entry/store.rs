//! Document store trait.
//!
//! Defines the interface the journal uses to query and append entries.

use super::model::{Entry, NewEntry};
use crate::error::Result;
use async_trait::async_trait;
use std::cmp::Ordering;

/// Collection that holds journal entries.
pub const ENTRIES_COLLECTION: &str = "entries";

/// Entry fields a query can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Date,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// An owner-scoped, ordered read query.
///
/// The default for the journal is `owner == uid`, ordered by `date`
/// descending. Ties keep the store's native order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub owner: String,
    pub order_by: EntryField,
    pub direction: SortDirection,
}

impl EntryQuery {
    /// Entries owned by `uid`, most recent date first.
    pub fn owned_by(uid: impl Into<String>) -> Self {
        Self {
            owner: uid.into(),
            order_by: EntryField::Date,
            direction: SortDirection::Descending,
        }
    }

    pub fn order_by(mut self, field: EntryField, direction: SortDirection) -> Self {
        self.order_by = field;
        self.direction = direction;
        self
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        entry.owner == self.owner
    }

    /// Filters and orders records the way a store executes this query.
    ///
    /// The sort is stable, so records comparing equal stay in input order.
    pub fn apply(&self, records: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
        let mut entries: Vec<Entry> = records.into_iter().filter(|e| self.matches(e)).collect();
        entries.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        entries
    }

    fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        match self.order_by {
            EntryField::Date => a.date.cmp(&b.date),
            EntryField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// An abstract document store holding journal entries.
///
/// This trait decouples the journal flow from the storage mechanism (TOML
/// files, a hosted document database, test doubles). Owner scoping is the
/// store's responsibility.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Runs a query against a collection.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Entry>)`: Matching entries in query order (empty when none)
    /// - `Err(_)`: Transport, permission or storage failure
    async fn query(&self, collection: &str, query: &EntryQuery) -> Result<Vec<Entry>>;

    /// Appends a record to a collection, assigning `id` and `created_at`.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The id assigned to the new record
    /// - `Err(_)`: The record was not written
    async fn insert(&self, collection: &str, entry: NewEntry) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, owner: &str, date: &str, minute: u32) -> Entry {
        Entry {
            id: id.to_string(),
            owner: owner.to_string(),
            date: date.to_string(),
            text: format!("text {id}"),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap(),
        }
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_owned_by_defaults_to_date_descending() {
        let query = EntryQuery::owned_by("u1");
        assert_eq!(query.order_by, EntryField::Date);
        assert_eq!(query.direction, SortDirection::Descending);
    }

    #[test]
    fn test_apply_filters_by_owner_and_sorts_descending() {
        let records = vec![
            entry("a", "u1", "2024-01-01", 0),
            entry("x", "u2", "2024-05-05", 1),
            entry("b", "u1", "2024-01-02", 2),
        ];

        let result = EntryQuery::owned_by("u1").apply(records);
        assert_eq!(ids(&result), vec!["b", "a"]);
    }

    #[test]
    fn test_apply_keeps_native_order_on_ties() {
        let records = vec![
            entry("first", "u1", "2024-02-01", 0),
            entry("second", "u1", "2024-02-01", 1),
            entry("older", "u1", "2024-01-01", 2),
        ];

        let result = EntryQuery::owned_by("u1").apply(records);
        assert_eq!(ids(&result), vec!["first", "second", "older"]);
    }

    #[test]
    fn test_apply_by_created_at_ascending() {
        let records = vec![
            entry("late", "u1", "2024-01-01", 9),
            entry("early", "u1", "2024-01-01", 1),
        ];

        let result = EntryQuery::owned_by("u1")
            .order_by(EntryField::CreatedAt, SortDirection::Ascending)
            .apply(records);
        assert_eq!(ids(&result), vec!["early", "late"]);
    }
}
