//! Domain layer for dayLog.
//!
//! Models, collaborator traits and the pure parts of the journal flow
//! (composer, search filter, view renderer). Nothing here performs I/O.

pub mod composer;
pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod identity;
pub mod session;
pub mod view;

// Re-export common types
pub use composer::{Composer, ComposerState, EntryDraft};
pub use entry::{DocumentStore, Entry, EntryQuery, NewEntry};
pub use error::{DaylogError, Result, ValidationError};
pub use identity::{Identity, IdentityProvider, Subscription};
pub use session::Session;
