//! Explicit keyed store for per-session client state.
//!
//! One entry per session id: the last good snapshot, the latest surfaced
//! error, and the draft edit buffer. The store is plain owned data passed to
//! whoever needs it (the runner owns one per view); there is no ambient
//! global cache.

use rustc_hash::FxHashMap;

use crate::buffer::DraftBuffer;
use crate::state::FoundryState;

/// Everything the client holds for one session id.
#[derive(Clone, Debug, Default)]
pub struct SessionEntry {
    /// Last successfully fetched snapshot; `None` before the first fetch or
    /// after invalidation.
    pub snapshot: Option<FoundryState>,
    /// Latest poll or dispatch error, shown alongside last-known-good data.
    pub last_error: Option<String>,
    /// The client-owned edit buffer, scoped to this session id.
    pub buffer: DraftBuffer,
}

/// Keyed map session id → [`SessionEntry`].
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    entries: FxHashMap<String, SessionEntry>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, session_id: &str) -> Option<&SessionEntry> {
        self.entries.get(session_id)
    }

    /// Entry for `session_id`, created empty on first access.
    pub fn entry_mut(&mut self, session_id: &str) -> &mut SessionEntry {
        self.entries.entry(session_id.to_string()).or_default()
    }

    /// Drop the cached snapshot for `session_id`, keeping the buffer. Called
    /// after a successful human action so the immediate refresh re-fetches
    /// rather than rendering stale state.
    pub fn invalidate(&mut self, session_id: &str) {
        if let Some(entry) = self.entries.get_mut(session_id) {
            entry.snapshot = None;
        }
    }

    /// Remove the whole entry. Buffer destruction on session switch goes
    /// through here.
    pub fn remove(&mut self, session_id: &str) -> Option<SessionEntry> {
        self.entries.remove(session_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
