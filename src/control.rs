//! The per-view state machine: one pure transition function over explicit
//! events.
//!
//! Every mutation of client state for an open session view funnels through
//! [`ControlState::apply`]: snapshot arrivals, poll failures, buffer and
//! comment edits, dispatch lifecycle, and session switches. The function
//! returns the scheduling [`Effect`]s the caller must perform; it never
//! touches a timer or socket itself, which is what makes the whole
//! reconciliation surface testable without time or I/O.
//!
//! The async driver that interprets effects lives in [`crate::runner`].

use std::time::Duration;

use tracing::debug;

use crate::client::{ApproveAck, FoundryError};
use crate::state::FoundryState;
use crate::store::{SessionEntry, SessionStore};
use crate::view::SessionViewModel;

/// Everything that can happen to an open session view.
#[derive(Debug)]
pub enum ViewEvent {
    /// A fetch completed with a snapshot (possibly for a superseded id).
    SnapshotReceived(FoundryState),
    /// A fetch completed with an error.
    PollFailed(FoundryError),
    /// The human typed into the draft buffer.
    BufferEdited(String),
    /// The human typed into the comments field.
    CommentsEdited(String),
    /// A human action left for the engine.
    DispatchStarted,
    /// The engine accepted the human action.
    DispatchSucceeded(ApproveAck),
    /// The engine rejected the action, or the request failed.
    DispatchFailed(String),
    /// The view switched to a different session id.
    SessionChanged(String),
}

/// Scheduling side effects requested by a transition. The driver owns the
/// actual timer and fetch future.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Arm (or re-arm) the poll timer.
    SchedulePoll(Duration),
    /// Disarm the poll timer and drop any in-flight fetch.
    CancelPoll,
    /// Issue one fetch immediately, regardless of the current schedule.
    FetchNow,
}

/// Mutable record for one open session view.
///
/// Owns the keyed [`SessionStore`] so snapshot caching, error surfacing, and
/// buffer lifetime all share a single writer path.
#[derive(Debug)]
pub struct ControlState {
    session_id: String,
    store: SessionStore,
    comments: String,
    dispatch_in_flight: bool,
    poll_interval: Duration,
}

impl ControlState {
    #[must_use]
    pub fn new(session_id: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            session_id: session_id.into(),
            store: SessionStore::new(),
            comments: String::new(),
            dispatch_in_flight: false,
            poll_interval,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn entry(&self) -> Option<&SessionEntry> {
        self.store.get(&self.session_id)
    }

    /// Current draft buffer text (empty before the first snapshot).
    #[must_use]
    pub fn buffer_text(&self) -> &str {
        self.entry().map_or("", |e| e.buffer.text())
    }

    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    #[must_use]
    pub fn dispatch_in_flight(&self) -> bool {
        self.dispatch_in_flight
    }

    /// UI-level gate for the four action controls: the snapshot says
    /// `AWAITING_HUMAN` and no dispatch is pending. The engine remains the
    /// authority either way.
    #[must_use]
    pub fn can_dispatch(&self) -> bool {
        !self.dispatch_in_flight
            && self
                .entry()
                .and_then(|e| e.snapshot.as_ref())
                .is_some_and(|s| s.status.is_awaiting_human())
    }

    /// Derived view model for the current snapshot, if any.
    #[must_use]
    pub fn view(&self) -> Option<SessionViewModel> {
        self.entry()
            .and_then(|e| e.snapshot.as_ref())
            .map(SessionViewModel::derive)
    }

    /// Latest surfaced error, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.entry().and_then(|e| e.last_error.as_deref())
    }

    /// The pure transition function: fold one event into the state and
    /// return the scheduling effects the driver must perform.
    pub fn apply(&mut self, event: ViewEvent) -> Vec<Effect> {
        match event {
            ViewEvent::SnapshotReceived(snapshot) => {
                if snapshot.session_id != self.session_id {
                    // Stale response for a superseded view; never applied
                    // out of order.
                    debug!(
                        stale = %snapshot.session_id,
                        current = %self.session_id,
                        "discarding snapshot for superseded session"
                    );
                    return vec![];
                }
                let entry = self.store.entry_mut(&self.session_id);
                entry.buffer.reconcile(&snapshot);
                entry.last_error = None;
                let continue_polling = snapshot.status.polls_continue();
                entry.snapshot = Some(snapshot);
                if continue_polling {
                    vec![Effect::SchedulePoll(self.poll_interval)]
                } else {
                    vec![]
                }
            }
            ViewEvent::PollFailed(err) => {
                let transient = err.is_transient();
                let entry = self.store.entry_mut(&self.session_id);
                entry.last_error = Some(err.to_string());
                if transient {
                    vec![Effect::SchedulePoll(self.poll_interval)]
                } else {
                    vec![Effect::CancelPoll]
                }
            }
            ViewEvent::BufferEdited(text) => {
                self.store.entry_mut(&self.session_id).buffer.edit(text);
                vec![]
            }
            ViewEvent::CommentsEdited(text) => {
                self.comments = text;
                vec![]
            }
            ViewEvent::DispatchStarted => {
                self.dispatch_in_flight = true;
                vec![]
            }
            ViewEvent::DispatchSucceeded(ack) => {
                debug!(session_id = %ack.session_id, status = %ack.status, "human action accepted");
                self.dispatch_in_flight = false;
                self.comments.clear();
                self.store.invalidate(&self.session_id);
                vec![Effect::FetchNow]
            }
            ViewEvent::DispatchFailed(reason) => {
                // Buffer and comments stay put so the user can retry without
                // retyping.
                self.dispatch_in_flight = false;
                self.store.entry_mut(&self.session_id).last_error = Some(reason);
                vec![]
            }
            ViewEvent::SessionChanged(next_id) => {
                let prior = std::mem::replace(&mut self.session_id, next_id);
                self.store.remove(&prior);
                self.comments.clear();
                self.dispatch_in_flight = false;
                vec![Effect::CancelPoll, Effect::FetchNow]
            }
        }
    }
}
