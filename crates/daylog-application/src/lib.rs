//! Application layer for dayLog.
//!
//! Wires an [`IdentityProvider`](daylog_core::identity::IdentityProvider) and a
//! [`DocumentStore`](daylog_core::entry::DocumentStore) into the journal
//! controller that front ends drive.

pub mod entry_store_adapter;
pub mod journal;

pub use entry_store_adapter::EntryStoreAdapter;
pub use journal::JournalController;
