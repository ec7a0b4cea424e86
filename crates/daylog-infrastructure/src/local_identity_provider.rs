//! Configuration-backed identity provider.
//!
//! Accounts come from `config.toml`; the signed-in account is persisted in
//! `session.toml` so a session survives restarts.

use crate::storage::DocumentFile;
use async_trait::async_trait;
use daylog_core::error::{DaylogError, Result};
use daylog_core::identity::{
    Identity, IdentityProvider, SessionChangeHandler, SessionListeners, Subscription,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Chooses the account to sign in as. Returning `None` cancels the sign-in.
///
/// `pick` may block (e.g. on a terminal prompt); the provider calls it on a
/// blocking thread.
pub trait AccountPicker: Send + Sync {
    fn pick(&self, accounts: &[Identity]) -> Option<Identity>;
}

/// Signs in as the first configured account.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstAccountPicker;

impl AccountPicker for FirstAccountPicker {
    fn pick(&self, accounts: &[Identity]) -> Option<Identity> {
        accounts.first().cloned()
    }
}

/// Signs in as the account with a fixed uid.
#[derive(Debug, Clone)]
pub struct UidPicker(pub String);

impl AccountPicker for UidPicker {
    fn pick(&self, accounts: &[Identity]) -> Option<Identity> {
        accounts.iter().find(|account| account.uid == self.0).cloned()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    uid: String,
}

/// Identity provider over a fixed list of local accounts.
pub struct LocalIdentityProvider {
    accounts: Vec<Identity>,
    picker: Arc<dyn AccountPicker>,
    session_file: DocumentFile<PersistedSession>,
    current: Mutex<Option<Identity>>,
    listeners: SessionListeners,
}

impl LocalIdentityProvider {
    /// Creates the provider and restores a persisted session.
    ///
    /// A persisted uid that no longer matches a configured account is
    /// treated as signed out.
    pub fn new(
        accounts: Vec<Identity>,
        picker: Arc<dyn AccountPicker>,
        session_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let session_file = DocumentFile::<PersistedSession>::new(session_path);

        let restored = session_file
            .load()?
            .and_then(|persisted| accounts.iter().find(|a| a.uid == persisted.uid).cloned());
        if let Some(identity) = &restored {
            tracing::info!(uid = %identity.uid, "restored persisted session");
        }

        Ok(Self {
            accounts,
            picker,
            session_file,
            current: Mutex::new(restored),
            listeners: SessionListeners::new(),
        })
    }

    pub fn accounts(&self) -> &[Identity] {
        &self.accounts
    }

    pub fn current(&self) -> Option<Identity> {
        self.lock_current().clone()
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Identity>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_current(&self, identity: Option<Identity>) {
        *self.lock_current() = identity.clone();
        self.listeners.notify(identity.as_ref());
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn interactive_sign_in(&self) -> Result<Identity> {
        if self.accounts.is_empty() {
            return Err(DaylogError::auth(
                "No accounts are configured; add an [[account]] to config.toml",
            ));
        }

        let picker = Arc::clone(&self.picker);
        let accounts = self.accounts.clone();
        let identity = tokio::task::spawn_blocking(move || picker.pick(&accounts))
            .await
            .map_err(|e| DaylogError::auth(format!("Sign-in prompt failed: {e}")))?
            .ok_or_else(|| DaylogError::auth("Sign-in was cancelled"))?;

        let file = self.session_file.clone();
        let persisted = PersistedSession {
            uid: identity.uid.clone(),
        };
        tokio::task::spawn_blocking(move || file.save(&persisted))
            .await
            .map_err(|e| DaylogError::auth(format!("Sign-in task failed: {e}")))?
            .map_err(|e| DaylogError::auth(format!("Failed to persist session: {e}")))?;

        tracing::info!(uid = %identity.uid, "signed in");
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        let file = self.session_file.clone();
        tokio::task::spawn_blocking(move || file.remove())
            .await
            .map_err(|e| DaylogError::auth(format!("Sign-out task failed: {e}")))?
            .map_err(|e| DaylogError::auth(format!("Failed to clear session: {e}")))?;

        tracing::info!("signed out");
        self.set_current(None);
        Ok(())
    }

    fn on_session_change(&self, handler: SessionChangeHandler) -> Subscription {
        let subscription = self.listeners.subscribe(Arc::clone(&handler));
        handler(self.current());
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn accounts() -> Vec<Identity> {
        vec![
            Identity::new("u1", "Ada"),
            Identity::new("u2", "Grace").with_avatar("https://example.com/grace.png"),
        ]
    }

    fn provider(temp_dir: &TempDir, picker: Arc<dyn AccountPicker>) -> LocalIdentityProvider {
        LocalIdentityProvider::new(accounts(), picker, temp_dir.path().join("session.toml"))
            .unwrap()
    }

    fn recorder() -> (SessionChangeHandler, Arc<Mutex<Vec<Option<String>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: SessionChangeHandler = Arc::new(move |identity: Option<Identity>| {
            sink.lock().unwrap().push(identity.map(|i| i.uid));
        });
        (handler, seen)
    }

    #[tokio::test]
    async fn test_subscribe_delivers_current_session_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir, Arc::new(FirstAccountPicker));
        let (handler, seen) = recorder();

        let _subscription = provider.on_session_change(handler);

        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_sign_in_notifies_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir, Arc::new(UidPicker("u2".to_string())));
        let (handler, seen) = recorder();
        let _subscription = provider.on_session_change(handler);

        let identity = provider.interactive_sign_in().await.unwrap();

        assert_eq!(identity.uid, "u2");
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("u2".to_string())]
        );
        assert!(temp_dir.path().join("session.toml").exists());
    }

    #[tokio::test]
    async fn test_session_restored_on_restart() {
        let temp_dir = TempDir::new().unwrap();
        {
            let provider = provider(&temp_dir, Arc::new(UidPicker("u1".to_string())));
            provider.interactive_sign_in().await.unwrap();
        }

        let restarted = provider(&temp_dir, Arc::new(FirstAccountPicker));
        assert_eq!(restarted.current().map(|i| i.uid), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn test_sign_out_clears_persisted_session() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir, Arc::new(FirstAccountPicker));
        provider.interactive_sign_in().await.unwrap();
        let (handler, seen) = recorder();
        let _subscription = provider.on_session_change(handler);

        provider.sign_out().await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("u1".to_string()), None]
        );
        assert!(!temp_dir.path().join("session.toml").exists());
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_sign_in_is_auth_error() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir, Arc::new(UidPicker("nobody".to_string())));

        let err = provider.interactive_sign_in().await.unwrap_err();

        assert!(err.is_auth());
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn test_no_accounts_is_auth_error() {
        let temp_dir = TempDir::new().unwrap();
        let provider = LocalIdentityProvider::new(
            Vec::new(),
            Arc::new(FirstAccountPicker),
            temp_dir.path().join("session.toml"),
        )
        .unwrap();

        assert!(provider.interactive_sign_in().await.unwrap_err().is_auth());
    }

    #[tokio::test]
    async fn test_unknown_persisted_uid_is_signed_out() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("session.toml"), "uid = \"ghost\"\n").unwrap();

        let provider = provider(&temp_dir, Arc::new(FirstAccountPicker));
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_notifications() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir, Arc::new(FirstAccountPicker));
        let (handler, seen) = recorder();

        provider.on_session_change(handler).unsubscribe();
        provider.interactive_sign_in().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }
}
