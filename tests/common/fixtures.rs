use chrono::Utc;
use uuid::Uuid;

use foundrysync::state::{Draft, FoundryState, Review};
use foundrysync::types::SessionStatus;

#[allow(dead_code)]
pub fn draft(id: &str, content: &str, version: u64) -> Draft {
    Draft {
        id: id.to_string(),
        content: content.to_string(),
        created_at: Utc::now(),
        created_by: "DraftingAgent".to_string(),
        parent_draft_id: None,
        version_number: version,
    }
}

#[allow(dead_code)]
pub fn review(agent: &str, draft_id: &str, safety: Option<f64>) -> Review {
    Review {
        id: Uuid::new_v4().to_string(),
        agent_name: agent.to_string(),
        target_draft_id: draft_id.to_string(),
        summary: format!("{agent} verdict"),
        line_level_comments: vec![],
        safety_score: safety,
        empathy_score: None,
        clinical_score: None,
        rationale: "fixture".to_string(),
    }
}

/// Minimal snapshot with the given status and no draft.
#[allow(dead_code)]
pub fn snapshot(session_id: &str, status: SessionStatus) -> FoundryState {
    FoundryState {
        session_id: session_id.to_string(),
        user_intent: "Draft a sleep hygiene protocol".to_string(),
        user_context: None,
        current_draft: None,
        draft_history: vec![],
        reviews: vec![],
        safety_score: None,
        empathy_score: None,
        clinical_score: None,
        iteration: 0,
        max_iterations: 4,
        status,
        approve_after_revision: false,
        error: None,
        scratchpads: Default::default(),
    }
}

#[allow(dead_code)]
pub fn snapshot_with_draft(
    session_id: &str,
    status: SessionStatus,
    current: Draft,
) -> FoundryState {
    let mut s = snapshot(session_id, status);
    s.current_draft = Some(current);
    s
}
