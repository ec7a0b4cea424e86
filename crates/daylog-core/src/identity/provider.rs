//! Identity provider trait and session-change subscriptions.

use super::model::Identity;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Callback invoked with the new session state: `Some(identity)` after a
/// sign-in (or a restored session), `None` after a sign-out.
pub type SessionChangeHandler = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// An abstract identity provider.
///
/// This trait decouples the journal flow from the concrete authentication
/// mechanism (OAuth popup, local accounts, test doubles).
///
/// # Implementation Notes
///
/// - `interactive_sign_in` must notify subscribers on success; callers rely on
///   the subscription, not on the returned identity, to update their session.
/// - `on_session_change` must deliver the current session to the new handler
///   immediately, so a restored session is picked up on subscribe.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Runs the interactive sign-in flow.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)`: The user signed in
    /// - `Err(DaylogError::Auth)`: The flow failed or was cancelled
    async fn interactive_sign_in(&self) -> Result<Identity>;

    /// Signs the current user out.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Signed out (or nobody was signed in)
    /// - `Err(DaylogError::Auth)`: The round trip failed
    async fn sign_out(&self) -> Result<()>;

    /// Registers a session-change handler.
    ///
    /// The handler stays registered until the returned `Subscription` is
    /// released or dropped.
    fn on_session_change(&self, handler: SessionChangeHandler) -> Subscription;
}

/// Disposer for a session-change registration.
///
/// Releasing happens exactly once: either through [`Subscription::unsubscribe`]
/// or when the value is dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Explicitly releases the registration.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    handlers: HashMap<u64, SessionChangeHandler>,
}

/// Registry of session-change handlers shared by provider implementations.
///
/// Handlers are invoked outside the registry lock, so a handler may itself
/// subscribe or unsubscribe.
#[derive(Clone, Default)]
pub struct SessionListeners {
    inner: Arc<Mutex<ListenerTable>>,
}

impl SessionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler and returns its disposer.
    pub fn subscribe(&self, handler: SessionChangeHandler) -> Subscription {
        let id = {
            let mut table = lock(&self.inner);
            let id = table.next_id;
            table.next_id += 1;
            table.handlers.insert(id, handler);
            id
        };

        let weak: Weak<Mutex<ListenerTable>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).handlers.remove(&id);
                tracing::debug!(listener_id = id, "session listener released");
            }
        })
    }

    /// Invokes every registered handler with the new session state.
    pub fn notify(&self, identity: Option<&Identity>) {
        let handlers: Vec<SessionChangeHandler> =
            lock(&self.inner).handlers.values().cloned().collect();
        for handler in handlers {
            handler(identity.cloned());
        }
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        lock(&self.inner).handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock(table: &Mutex<ListenerTable>) -> MutexGuard<'_, ListenerTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}
