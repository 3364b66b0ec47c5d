//! Serde models for the Foundry engine's session state.
//!
//! Everything here mirrors the JSON the engine returns from
//! `GET /sessions/{id}/state`: one [`FoundryState`] snapshot per fetch, never
//! partially. The client treats snapshots as immutable observations; the only
//! client-owned mutable state lives in [`crate::buffer`] and [`crate::store`].
//!
//! Field-level `serde(default)` is deliberate throughout: the engine omits
//! absent optionals rather than sending `null` in some code paths, and older
//! checkpoints may predate newer fields.
//!
//! # Examples
//!
//! ```rust
//! use foundrysync::state::FoundryState;
//! use foundrysync::types::SessionStatus;
//!
//! let snapshot: FoundryState = serde_json::from_value(serde_json::json!({
//!     "session_id": "s-1",
//!     "user_intent": "Draft a sleep hygiene protocol",
//!     "status": "DRAFTING",
//! }))
//! .unwrap();
//!
//! assert_eq!(snapshot.status, SessionStatus::Drafting);
//! assert!(snapshot.current_draft.is_none());
//! assert_eq!(snapshot.max_iterations, 4);
//! ```

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::types::SessionStatus;

/// One versioned snapshot of the protocol text.
///
/// A session has at most one current draft plus an ordered history of
/// superseded drafts. `version_number` strictly increases across
/// `draft_history + [current_draft]`; the reconciler uses `(id,
/// version_number)` as the draft's change identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Agent that produced this draft (e.g. `"DraftingAgent"`).
    pub created_by: String,
    #[serde(default)]
    pub parent_draft_id: Option<String>,
    #[serde(default = "default_version")]
    pub version_number: u64,
}

fn default_version() -> u64 {
    1
}

impl Draft {
    /// Change identity used by the reconciler: a draft counts as "changed"
    /// when either the id or the version number differs.
    #[must_use]
    pub fn identity(&self) -> (&str, u64) {
        (&self.id, self.version_number)
    }
}

/// A line-anchored comment inside a review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineComment {
    pub section_id: String,
    pub comment: String,
}

/// One agent's verdict on a specific draft.
///
/// Scores are optional because not every reviewer emits every score; absence
/// is meaningful and must not be collapsed to zero downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub agent_name: String,
    pub target_draft_id: String,
    pub summary: String,
    #[serde(default)]
    pub line_level_comments: Vec<LineComment>,
    #[serde(default)]
    pub safety_score: Option<f64>,
    #[serde(default)]
    pub empathy_score: Option<f64>,
    #[serde(default)]
    pub clinical_score: Option<f64>,
    pub rationale: String,
}

/// Freeform working notes keyed by agent name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentScratchpad {
    #[serde(default)]
    pub notes: FxHashMap<String, String>,
}

/// The full session snapshot returned by `GET /sessions/{id}/state`.
///
/// The `reviews` sequence is append-only and chronologically ordered on the
/// engine side; an agent may appear many times across iterations. The client
/// never deduplicates it in place — [`crate::reducers::latest_by_agent`]
/// derives the latest-per-agent view on demand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoundryState {
    pub session_id: String,
    pub user_intent: String,
    #[serde(default)]
    pub user_context: Option<String>,

    #[serde(default)]
    pub current_draft: Option<Draft>,
    #[serde(default)]
    pub draft_history: Vec<Draft>,
    #[serde(default)]
    pub reviews: Vec<Review>,

    // Aggregate scores computed by the engine's supervisor.
    #[serde(default)]
    pub safety_score: Option<f64>,
    #[serde(default)]
    pub empathy_score: Option<f64>,
    #[serde(default)]
    pub clinical_score: Option<f64>,

    #[serde(default)]
    pub iteration: u64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
    #[serde(default = "default_status")]
    pub status: SessionStatus,
    /// Set by `APPROVE_CONTINUE`: auto-approve once the pending revision
    /// cycle completes.
    #[serde(default)]
    pub approve_after_revision: bool,

    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub scratchpads: AgentScratchpad,
}

fn default_max_iterations() -> u64 {
    4
}

fn default_status() -> SessionStatus {
    SessionStatus::Init
}

impl FoundryState {
    /// Content of the current draft, or the empty string when no draft has
    /// been generated yet. This is the value a fresh edit buffer initializes
    /// from.
    #[must_use]
    pub fn current_draft_content(&self) -> &str {
        self.current_draft.as_ref().map_or("", |d| &d.content)
    }
}

/// One row of `GET /sessions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
