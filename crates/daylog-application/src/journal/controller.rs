//! Journal controller.
//!
//! Owns the signed-in user's journal: it follows the identity provider's
//! session, keeps the entry cache in step with the store, and drives the
//! search box and the composer.

use super::state::{FetchTicket, JournalState, SharedState, lock};
use crate::entry_store_adapter::EntryStoreAdapter;
use daylog_core::composer::Composer;
use daylog_core::entry::Entry;
use daylog_core::error::{DaylogError, Result};
use daylog_core::filter::visible_entries;
use daylog_core::identity::{Identity, IdentityProvider, SessionChangeHandler, Subscription};
use daylog_core::session::Session;
use daylog_core::view::{View, ViewInput, render};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

struct Mounted {
    subscription: Subscription,
    listener: JoinHandle<()>,
}

/// Coordinates session, entry cache, search term and composer.
///
/// Session changes are applied synchronously inside the provider's
/// notification: by the time the provider returns, a sign-out or a switch to
/// another account has already emptied the cache. Fetches then run on spawned
/// tasks and only install their result if the session they were issued for is
/// still current.
pub struct JournalController {
    identity_provider: Arc<dyn IdentityProvider>,
    entries: EntryStoreAdapter,
    state: SharedState,
    mounted: Mutex<Option<Mounted>>,
}

impl JournalController {
    pub fn new(identity_provider: Arc<dyn IdentityProvider>, entries: EntryStoreAdapter) -> Self {
        Self {
            identity_provider,
            entries,
            state: Arc::new(Mutex::new(JournalState::new())),
            mounted: Mutex::new(None),
        }
    }

    /// Starts following the identity provider.
    ///
    /// Must be called from within a tokio runtime. Mounting twice is a no-op.
    pub fn mount(self: &Arc<Self>) {
        let mut mounted = self.mounted.lock().unwrap_or_else(PoisonError::into_inner);
        if mounted.is_some() {
            tracing::warn!("[JournalController] already mounted");
            return;
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<FetchTicket>();

        let weak = Arc::downgrade(self);
        let listener = tokio::spawn(async move {
            while let Some(ticket) = rx.recv().await {
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                tokio::spawn(async move {
                    // Failures are logged inside run_fetch.
                    let _ = controller.run_fetch(ticket).await;
                });
            }
        });

        let state = Arc::clone(&self.state);
        let handler: SessionChangeHandler = Arc::new(move |identity: Option<Identity>| {
            let ticket = {
                let mut st = lock(&state);
                let uid = identity.as_ref().map(|i| i.uid.clone());
                let next = st.apply_session(identity);
                tracing::info!(uid = ?uid, epoch = st.epoch(), "[JournalController] session changed");
                next.map(|identity| FetchTicket::issue(&state, &mut st, identity))
            };

            if let Some(ticket) = ticket
                && tx.send(ticket).is_err()
            {
                tracing::debug!("[JournalController] listener gone, fetch dropped");
            }
        });

        let subscription = self.identity_provider.on_session_change(handler);
        *mounted = Some(Mounted {
            subscription,
            listener,
        });
        tracing::debug!("[JournalController] mounted");
    }

    /// Stops following the identity provider. Fetches already in flight still
    /// complete but cannot outlive a later session change.
    pub fn unmount(&self) {
        let mounted = self
            .mounted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(Mounted {
            subscription,
            listener,
        }) = mounted
        {
            subscription.unsubscribe();
            listener.abort();
            tracing::debug!("[JournalController] unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    async fn run_fetch(&self, ticket: FetchTicket) -> Result<()> {
        let outcome = match self.entries.fetch_entries(&ticket.identity).await {
            Ok(entries) => {
                let mut st = lock(&self.state);
                if st.accepts(ticket.epoch, &ticket.identity.uid) {
                    tracing::debug!(
                        uid = %ticket.identity.uid,
                        count = entries.len(),
                        "[JournalController] entry cache replaced"
                    );
                    st.cache.replace(entries);
                } else {
                    tracing::debug!(
                        uid = %ticket.identity.uid,
                        epoch = ticket.epoch,
                        "[JournalController] stale fetch discarded"
                    );
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    uid = %ticket.identity.uid,
                    error = %e,
                    "[JournalController] fetch failed"
                );
                Err(e)
            }
        };

        // Lowers the loading flag, after the cache is installed.
        drop(ticket);
        outcome
    }

    /// Runs the provider's interactive sign-in. The session itself changes
    /// through the provider's notification.
    ///
    /// # Errors
    ///
    /// `DaylogError::Auth` if the provider fails or the user cancels. The
    /// session is left unchanged.
    pub async fn begin_sign_in(&self) -> Result<()> {
        match self.identity_provider.interactive_sign_in().await {
            Ok(identity) => {
                tracing::info!(uid = %identity.uid, "[JournalController] sign-in completed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "[JournalController] sign-in failed");
                Err(as_auth(e))
            }
        }
    }

    /// Signs out through the provider.
    ///
    /// On success the cache, search term and draft are gone before this
    /// returns, whether or not the provider notified.
    ///
    /// # Errors
    ///
    /// `DaylogError::Auth` if the provider fails; nothing is cleared.
    pub async fn sign_out_current(&self) -> Result<()> {
        if let Err(e) = self.identity_provider.sign_out().await {
            tracing::error!(error = %e, "[JournalController] sign-out failed");
            return Err(as_auth(e));
        }

        let mut st = lock(&self.state);
        if st.session.is_signed_in() {
            st.apply_session(None);
        }
        Ok(())
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        lock(&self.state).search_term = term.into();
    }

    /// Shows the composer; an existing draft is kept.
    pub fn open_composer(&self) -> Result<()> {
        self.with_composer(Composer::open)
    }

    /// Floating action: opens the composer, or closes it and discards the
    /// draft.
    pub fn toggle_composer(&self) -> Result<()> {
        self.with_composer(Composer::toggle)
    }

    /// Hides the composer and discards the draft.
    pub fn cancel_composer(&self) {
        lock(&self.state).composer.cancel();
    }

    /// Overlay dismissal: hides the composer and discards the draft.
    pub fn dismiss_composer(&self) {
        lock(&self.state).composer.dismiss();
    }

    /// Returns false if the composer is hidden and nothing changed.
    pub fn set_draft_date(&self, date: impl Into<String>) -> bool {
        lock(&self.state).composer.set_date(date)
    }

    pub fn set_draft_text(&self, text: impl Into<String>) -> bool {
        lock(&self.state).composer.set_text(text)
    }

    pub fn push_draft_line(&self, line: &str) -> bool {
        lock(&self.state).composer.push_line(line)
    }

    /// Validates the draft, writes it, and refreshes the cache.
    ///
    /// On success the composer is hidden and cleared, unless it no longer
    /// holds the saved draft (a session change already discarded it and a new
    /// draft may have been started). Validation failures make no store call;
    /// write failures keep the draft and the composer open.
    ///
    /// # Errors
    ///
    /// `NotSignedIn`, `Validation`, or `Write`. A failed refresh after a
    /// successful write is logged, not returned.
    pub async fn save_entry(&self) -> Result<()> {
        let (identity, draft) = {
            let st = lock(&self.state);
            let identity = st
                .session
                .identity()
                .cloned()
                .ok_or(DaylogError::NotSignedIn)?;
            let draft = st.composer.validate().inspect_err(|reason| {
                tracing::warn!(reason = %reason, "[JournalController] draft rejected");
            })?;
            (identity, draft)
        };

        if let Err(e) = self.entries.append_entry(&identity, &draft).await {
            tracing::error!(uid = %identity.uid, error = %e, "[JournalController] save failed");
            return Err(e);
        }

        let ticket = {
            let mut st = lock(&self.state);
            if st.session.uid() == Some(identity.uid.as_str()) {
                Some(FetchTicket::issue(&self.state, &mut st, identity))
            } else {
                None
            }
        };

        match ticket {
            Some(ticket) => {
                let _ = self.run_fetch(ticket).await;
            }
            None => {
                tracing::debug!("[JournalController] session changed during save, refresh skipped");
            }
        }

        let mut st = lock(&self.state);
        if st.composer.validate().as_ref() == Ok(&draft) {
            st.composer.finish();
        }
        Ok(())
    }

    fn with_composer(&self, action: impl FnOnce(&mut Composer)) -> Result<()> {
        let mut st = lock(&self.state);
        if !st.session.is_signed_in() {
            return Err(DaylogError::NotSignedIn);
        }
        action(&mut st.composer);
        Ok(())
    }

    pub fn session(&self) -> Session {
        lock(&self.state).session.clone()
    }

    pub fn search_term(&self) -> String {
        lock(&self.state).search_term.clone()
    }

    pub fn composer(&self) -> Composer {
        lock(&self.state).composer.clone()
    }

    /// The full cache for the current user, in store order.
    pub fn entries(&self) -> Arc<Vec<Entry>> {
        lock(&self.state).cache.snapshot()
    }

    /// The cache filtered by the current search term.
    pub fn visible_entries(&self) -> Vec<Entry> {
        let st = lock(&self.state);
        visible_entries(&st.cache.snapshot(), &st.search_term)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        lock(&self.state).subscribe_loading()
    }

    /// Resolves once no fetch is outstanding.
    pub async fn wait_until_idle(&self) {
        let mut loading = self.subscribe_loading();
        let _ = loading.wait_for(|loading| !*loading).await;
    }

    /// Renders the current state.
    pub fn view(&self) -> View {
        let st = lock(&self.state);
        let cache = st.cache.snapshot();
        render(&ViewInput {
            session: &st.session,
            cache: &cache,
            search_term: &st.search_term,
            composer: &st.composer,
            loading: st.is_loading(),
        })
    }
}

impl Drop for JournalController {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn as_auth(error: DaylogError) -> DaylogError {
    match error {
        DaylogError::Auth(_) => error,
        other => DaylogError::auth(other.to_string()),
    }
}
