//! Presentation-ready derivations from a reconciled snapshot.
//!
//! Pure, recomputed on every update, no side effects. Nothing downstream
//! consumes these values except the rendering layer, which is out of scope
//! here.

use rustc_hash::FxHashMap;

use crate::reducers::latest_by_agent;
use crate::state::{FoundryState, Review};

/// Derived booleans and counters for one session view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionViewModel {
    /// The human-review gate is open; action controls should be enabled.
    pub is_awaiting_human: bool,
    /// The session will never transition again.
    pub is_terminal: bool,
    /// `len(draft_history) + (1 if current_draft present)`.
    pub draft_count: usize,
    /// `iteration / max_iterations`, or `0.0` when `max_iterations == 0`.
    pub progress_ratio: f64,
    /// Latest verdict per agent, merged from the append-only review sequence.
    pub latest_reviews: FxHashMap<String, Review>,
}

impl SessionViewModel {
    /// Derive all fields from one snapshot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foundrysync::state::FoundryState;
    /// use foundrysync::view::SessionViewModel;
    ///
    /// let snapshot: FoundryState = serde_json::from_value(serde_json::json!({
    ///     "session_id": "s-1",
    ///     "user_intent": "intent",
    ///     "status": "REVIEWING",
    ///     "iteration": 1,
    ///     "max_iterations": 4,
    /// }))
    /// .unwrap();
    ///
    /// let view = SessionViewModel::derive(&snapshot);
    /// assert_eq!(view.draft_count, 0);
    /// assert_eq!(view.progress_ratio, 0.25);
    /// assert!(!view.is_terminal);
    /// ```
    #[must_use]
    pub fn derive(snapshot: &FoundryState) -> Self {
        let progress_ratio = if snapshot.max_iterations == 0 {
            0.0
        } else {
            snapshot.iteration as f64 / snapshot.max_iterations as f64
        };
        Self {
            is_awaiting_human: snapshot.status.is_awaiting_human(),
            is_terminal: snapshot.status.is_terminal(),
            draft_count: snapshot.draft_history.len()
                + usize::from(snapshot.current_draft.is_some()),
            progress_ratio,
            latest_reviews: latest_by_agent(&snapshot.reviews),
        }
    }
}
