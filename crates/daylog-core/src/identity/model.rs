//! Identity domain model.

use serde::{Deserialize, Serialize};

/// The authenticated user's profile as issued by the identity provider.
///
/// dayLog never mutates an identity; it only reads the uid to scope store
/// queries and the display fields for the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable, provider-issued user identifier
    pub uid: String,
    /// Name shown in the welcome line
    pub display_name: String,
    /// Optional avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}
