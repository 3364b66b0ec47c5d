//! The client-owned draft edit buffer and its reconciliation rules.
//!
//! The buffer is the one piece of shared mutable state in the whole layer: it
//! mirrors the server's current draft while the engine is running, then hands
//! write ownership to the human the moment a snapshot arrives with status
//! `AWAITING_HUMAN`. The rules in [`DraftBuffer::reconcile`] are what keep a
//! late poll response from clobbering in-progress edits.
//!
//! Scoped to one session id; switching sessions destroys the buffer (see
//! [`crate::store::SessionStore`]).

use crate::state::FoundryState;
use crate::types::SessionStatus;

/// Client-held, possibly-edited, possibly-stale copy of the current draft's
/// text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftBuffer {
    text: String,
    initialized: bool,
    /// `(draft id, version_number)` of the last server draft mirrored into
    /// the buffer. Used to detect draft changes while no edit session is
    /// active.
    seen_draft: Option<(String, u64)>,
}

impl DraftBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the buffer has been seeded from a snapshot (or a user edit).
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Record a user edit. The user's keystrokes are the exclusive writer
    /// while the session is `AWAITING_HUMAN`; reconciliation will not touch
    /// the buffer again until the status moves on and a new draft appears.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.initialized = true;
    }

    /// Apply one incoming snapshot to the buffer.
    ///
    /// Rules, evaluated in order:
    ///
    /// 1. Uninitialized buffer: seed from `current_draft.content` (empty
    ///    string if absent) and mark initialized.
    /// 2. Status ≠ `AWAITING_HUMAN`: overwrite whenever the draft identity
    ///    `(id, version_number)` changed, so the buffer keeps mirroring the
    ///    latest server draft while no human edit session is active.
    /// 3. Status == `AWAITING_HUMAN`: leave the buffer untouched, even if the
    ///    draft id changed underneath — a human is editing and must not lose
    ///    work to a poll response.
    ///
    /// Returns `true` when the buffer text was replaced.
    pub fn reconcile(&mut self, snapshot: &FoundryState) -> bool {
        if !self.initialized {
            self.text = snapshot.current_draft_content().to_string();
            self.initialized = true;
            self.seen_draft = snapshot
                .current_draft
                .as_ref()
                .map(|d| (d.id.clone(), d.version_number));
            return true;
        }

        if snapshot.status == SessionStatus::AwaitingHuman {
            return false;
        }

        let incoming = snapshot
            .current_draft
            .as_ref()
            .map(|d| (d.id.clone(), d.version_number));
        if incoming != self.seen_draft {
            self.text = snapshot.current_draft_content().to_string();
            self.seen_draft = incoming;
            return true;
        }
        false
    }
}
