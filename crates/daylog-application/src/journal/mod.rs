//! The journal: session-scoped entry cache, search and composer.

mod controller;
mod state;


pub use controller::JournalController;
pub use state::EntryCache;
