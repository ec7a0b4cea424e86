//! Entry domain module.
//!
//! # Module Structure
//!
//! - `model`: Journal entry records (`Entry`, `NewEntry`)
//! - `store`: Document store trait and the owner-scoped query (`DocumentStore`, `EntryQuery`)

mod model;
mod store;

// Re-export public API
pub use model::{Entry, NewEntry};
pub use store::{DocumentStore, ENTRIES_COLLECTION, EntryField, EntryQuery, SortDirection};
