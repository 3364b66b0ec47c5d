//! Deterministic merges over the engine's append-only review sequence.
//!
//! The engine never deduplicates reviews: when reviewer agents run again on a
//! revised draft, their new verdicts are appended after the old ones. The view
//! layer wants exactly one verdict per agent — the most recent — so the merge
//! here is last-write-wins in input order.

use rustc_hash::FxHashMap;

use crate::state::Review;

/// Merge a chronological review sequence into the latest verdict per agent.
///
/// Iterates in order and unconditionally overwrites, so the result holds the
/// highest-index review for each distinct `agent_name`. Agents with zero
/// reviews get no entry; absence is meaningful (the view renders a waiting
/// state, not a synthetic zero score).
///
/// Idempotent: merging a sequence twice, or a prefix followed by the full
/// sequence, yields the same map as merging once.
///
/// # Examples
///
/// ```rust
/// use foundrysync::reducers::latest_by_agent;
/// use foundrysync::state::Review;
///
/// let mk = |id: &str, agent: &str, safety: f64| Review {
///     id: id.into(),
///     agent_name: agent.into(),
///     target_draft_id: "d1".into(),
///     summary: String::new(),
///     line_level_comments: vec![],
///     safety_score: Some(safety),
///     empathy_score: None,
///     clinical_score: None,
///     rationale: String::new(),
/// };
///
/// let reviews = vec![mk("r1", "A", 0.4), mk("r2", "B", 0.9), mk("r3", "A", 0.8)];
/// let latest = latest_by_agent(&reviews);
///
/// assert_eq!(latest.len(), 2);
/// assert_eq!(latest["A"].safety_score, Some(0.8));
/// assert_eq!(latest["B"].safety_score, Some(0.9));
/// ```
#[must_use]
pub fn latest_by_agent(reviews: &[Review]) -> FxHashMap<String, Review> {
    let mut latest = FxHashMap::default();
    for review in reviews {
        latest.insert(review.agent_name.clone(), review.clone());
    }
    latest
}
