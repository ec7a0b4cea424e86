//! Session state.

use crate::identity::Identity;
use serde::Serialize;

/// The current identity, or signed out.
///
/// Only the session tracker mutates the session, in response to provider
/// notifications and a successful sign-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "identity", rename_all = "snake_case")]
pub enum Session {
    #[default]
    SignedOut,
    SignedIn(Identity),
}

impl Session {
    pub fn from_identity(identity: Option<Identity>) -> Self {
        identity.map_or(Self::SignedOut, Self::SignedIn)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::SignedOut => None,
        }
    }

    pub fn uid(&self) -> Option<&str> {
        self.identity().map(|identity| identity.uid.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }
}
