//! Core vocabulary types for the Foundry synchronization layer.
//!
//! This module defines the two closed enumerations shared by every other
//! module: the session lifecycle [`SessionStatus`] owned by the remote
//! workflow engine, and the [`HumanAction`] set an operator can take while a
//! session is parked at `AWAITING_HUMAN`.
//!
//! Both types serialize to the engine's SCREAMING_SNAKE wire strings, so they
//! can be used directly in request/response bodies.
//!
//! # Examples
//!
//! ```rust
//! use foundrysync::types::{HumanAction, SessionStatus};
//!
//! assert!(SessionStatus::Approved.is_terminal());
//! assert!(!SessionStatus::AwaitingHuman.polls_continue());
//! assert!(SessionStatus::Drafting.polls_continue());
//!
//! let wire = serde_json::to_string(&HumanAction::RequestRevision).unwrap();
//! assert_eq!(wire, "\"REQUEST_REVISION\"");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a remote Foundry session.
///
/// The engine is the sole writer of this value; the client only observes it.
/// The order of variants mirrors the order in which a healthy session moves
/// through the pipeline, though the engine may loop `Reviewing → Revising`
/// several times before parking at [`AwaitingHuman`](Self::AwaitingHuman).
///
/// `Approved`, `Failed`, and `Rejected` are terminal: once observed, the
/// session never transitions again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Session created, nothing produced yet.
    Init,
    /// The drafting agent is writing the first or next protocol draft.
    Drafting,
    /// The parallel critique phase: reviewer agents are scoring the draft.
    Reviewing,
    /// A revision agent is rewriting the draft from reviewer feedback.
    Revising,
    /// The engine is parked, waiting for a human decision.
    AwaitingHuman,
    /// Terminal: a human accepted the protocol.
    Approved,
    /// Terminal: the engine gave up (error or iteration bound exceeded).
    Failed,
    /// Terminal: a human rejected the protocol outright.
    Rejected,
}

impl SessionStatus {
    /// Returns `true` for statuses the session can never leave.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Failed | Self::Rejected)
    }

    /// Returns `true` while the human-review gate is open.
    #[must_use]
    pub fn is_awaiting_human(&self) -> bool {
        matches!(self, Self::AwaitingHuman)
    }

    /// Scheduling predicate for the poller: `true` iff another fetch should
    /// be scheduled after a snapshot carrying this status.
    ///
    /// Polling stops on terminal statuses and on `AwaitingHuman` (the engine
    /// will not move again until the human acts, so there is nothing to poll
    /// for).
    #[must_use]
    pub fn polls_continue(&self) -> bool {
        !self.is_terminal() && !self.is_awaiting_human()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "INIT",
            Self::Drafting => "DRAFTING",
            Self::Reviewing => "REVIEWING",
            Self::Revising => "REVISING",
            Self::AwaitingHuman => "AWAITING_HUMAN",
            Self::Approved => "APPROVED",
            Self::Failed => "FAILED",
            Self::Rejected => "REJECTED",
        };
        write!(f, "{s}")
    }
}

/// One of the four mutually-exclusive decisions a human can submit for a
/// session at `AWAITING_HUMAN`.
///
/// The engine is the authority on whether an action is currently legal; the
/// client only gates the controls in the view layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HumanAction {
    /// Accept the current draft as final; the session ends `APPROVED`.
    ApproveFinal,
    /// Accept, but let the agents run one more revision cycle before the
    /// session auto-approves.
    ApproveContinue,
    /// Send the draft back to the revision agent with comments.
    RequestRevision,
    /// Reject the protocol; the session ends `REJECTED`.
    Reject,
}

impl fmt::Display for HumanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ApproveFinal => "APPROVE_FINAL",
            Self::ApproveContinue => "APPROVE_CONTINUE",
            Self::RequestRevision => "REQUEST_REVISION",
            Self::Reject => "REJECT",
        };
        write!(f, "{s}")
    }
}
