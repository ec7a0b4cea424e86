//! Configuration model (`config.toml`).

use crate::entry::ENTRIES_COLLECTION;
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root of `config.toml`.
///
/// ```toml
/// [store]
/// collection = "entries"
///
/// [logging]
/// level = "info"
///
/// [[account]]
/// uid = "local"
/// display_name = "You"
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(rename = "account", default)]
    pub accounts: Vec<AccountConfig>,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            store: StoreSettings::default(),
            logging: LoggingSettings::default(),
            accounts: vec![AccountConfig::default()],
        }
    }
}

impl RootConfig {
    /// Accounts the local identity provider can sign in as.
    pub fn identities(&self) -> Vec<Identity> {
        self.accounts.iter().map(AccountConfig::to_identity).collect()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StoreSettings {
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            data_dir: None,
        }
    }
}

fn default_collection() -> String {
    ENTRIES_COLLECTION.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AccountConfig {
    pub uid: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            uid: "local".to_string(),
            display_name: "You".to_string(),
            avatar_url: None,
        }
    }
}

impl AccountConfig {
    pub fn to_identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}
