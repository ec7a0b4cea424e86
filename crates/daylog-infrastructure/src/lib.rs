//! Infrastructure layer for dayLog: file-backed implementations of the
//! collaborator traits defined in `daylog-core`.

pub mod config_service;
pub mod local_identity_provider;
pub mod paths;
pub mod storage;
pub mod toml_entry_store;

pub use crate::config_service::ConfigService;
pub use crate::local_identity_provider::{
    AccountPicker, FirstAccountPicker, LocalIdentityProvider, UidPicker,
};
pub use crate::paths::DaylogPaths;
pub use crate::toml_entry_store::TomlEntryStore;
