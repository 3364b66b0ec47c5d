use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use foundrysync::client::{
    ApproveAck, CreateSessionRequest, CreateSessionResponse, FoundryError, HumanApproveRequest,
    StateTransport,
};
use foundrysync::state::{FoundryState, SessionSummary};

/// Scripted [`StateTransport`] for runner tests: fetch and approve responses
/// are popped from queues in order, and every approve request is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    fetches: Mutex<VecDeque<Result<FoundryState, FoundryError>>>,
    approvals: Mutex<VecDeque<Result<ApproveAck, FoundryError>>>,
    fetch_count: AtomicUsize,
    approve_requests: Mutex<Vec<(String, HumanApproveRequest)>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_snapshot(&self, snapshot: FoundryState) {
        self.fetches.lock().unwrap().push_back(Ok(snapshot));
    }

    pub fn push_fetch_error(&self, err: FoundryError) {
        self.fetches.lock().unwrap().push_back(Err(err));
    }

    pub fn push_approval(&self, result: Result<ApproveAck, FoundryError>) {
        self.approvals.lock().unwrap().push_back(result);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn approve_requests(&self) -> Vec<(String, HumanApproveRequest)> {
        self.approve_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateTransport for ScriptedTransport {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, FoundryError> {
        Ok(vec![])
    }

    async fn create_session(
        &self,
        _request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, FoundryError> {
        Err(FoundryError::Transient {
            reason: "not scripted".to_string(),
        })
    }

    async fn fetch_state(&self, _session_id: &str) -> Result<FoundryState, FoundryError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.fetches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(FoundryError::Transient {
                    reason: "scripted transport exhausted".to_string(),
                })
            })
    }

    async fn human_approve(
        &self,
        session_id: &str,
        request: &HumanApproveRequest,
    ) -> Result<ApproveAck, FoundryError> {
        self.approve_requests
            .lock()
            .unwrap()
            .push((session_id.to_string(), request.clone()));
        self.approvals
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(FoundryError::DispatchFailed {
                    reason: "scripted transport exhausted".to_string(),
                })
            })
    }
}
