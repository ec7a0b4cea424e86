//! Mutable journal state shared between the controller, the session handler
//! and in-flight fetches.
//!
//! The lock is only ever held for short, synchronous sections; nothing awaits
//! while holding it.

use daylog_core::composer::Composer;
use daylog_core::entry::Entry;
use daylog_core::identity::Identity;
use daylog_core::session::Session;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;

pub(crate) type SharedState = Arc<Mutex<JournalState>>;

pub(crate) fn lock(state: &Mutex<JournalState>) -> MutexGuard<'_, JournalState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Snapshot of the current user's entries in store order.
///
/// Replaced wholesale; readers holding an older `Arc` keep a complete,
/// consistent copy.
#[derive(Debug, Clone, Default)]
pub struct EntryCache {
    entries: Arc<Vec<Entry>>,
}

impl EntryCache {
    pub fn snapshot(&self) -> Arc<Vec<Entry>> {
        Arc::clone(&self.entries)
    }

    pub fn replace(&mut self, entries: Vec<Entry>) {
        self.entries = Arc::new(entries);
    }

    pub fn clear(&mut self) {
        self.entries = Arc::new(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) struct JournalState {
    pub session: Session,
    /// Bumped on every session change; fetch results from an older epoch are
    /// discarded.
    epoch: u64,
    pub cache: EntryCache,
    pub search_term: String,
    pub composer: Composer,
    in_flight: usize,
    loading_tx: watch::Sender<bool>,
}

impl JournalState {
    pub fn new() -> Self {
        let (loading_tx, _) = watch::channel(false);
        Self {
            session: Session::SignedOut,
            epoch: 0,
            cache: EntryCache::default(),
            search_term: String::new(),
            composer: Composer::new(),
            in_flight: 0,
            loading_tx,
        }
    }

    /// Installs a new session. Returns the identity to fetch for, if any.
    ///
    /// Whenever the uid changes (sign-out, or a direct switch to another
    /// account) the cache, the search term and any draft are cleared before
    /// the lock is released. Re-announcing the same uid keeps them.
    pub fn apply_session(&mut self, identity: Option<Identity>) -> Option<Identity> {
        self.epoch += 1;
        let previous = self.session.uid().map(str::to_owned);
        self.session = Session::from_identity(identity);

        if self.session.uid() != previous.as_deref() {
            self.cache.clear();
            self.search_term.clear();
            self.composer.cancel();
        }
        self.session.identity().cloned()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a fetch issued at `epoch` for `uid` may still install its result.
    pub fn accepts(&self, epoch: u64, uid: &str) -> bool {
        self.epoch == epoch && self.session.uid() == Some(uid)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    fn begin_fetch(&mut self) {
        self.in_flight += 1;
        self.loading_tx.send_replace(true);
    }

    fn end_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading_tx.send_replace(self.in_flight > 0);
    }
}

/// A fetch that has been issued but not yet completed.
///
/// Holding a ticket keeps the loading flag raised; dropping it (after success,
/// failure, or if it is never run) lowers it. Never drop a ticket while the
/// state lock is held.
pub(crate) struct FetchTicket {
    pub epoch: u64,
    pub identity: Identity,
    _loading: LoadingGuard,
}

impl FetchTicket {
    /// Issues a ticket for `identity` at the current epoch. `state` must be
    /// the locked contents of `shared`.
    pub fn issue(shared: &SharedState, state: &mut JournalState, identity: Identity) -> Self {
        state.begin_fetch();
        Self {
            epoch: state.epoch,
            identity,
            _loading: LoadingGuard {
                state: Arc::downgrade(shared),
            },
        }
    }
}

struct LoadingGuard {
    state: Weak<Mutex<JournalState>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state).end_fetch();
        }
    }
}
