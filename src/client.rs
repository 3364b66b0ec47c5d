//! REST transport against the Foundry workflow engine.
//!
//! Four endpoints, JSON over HTTP:
//!
//! - `GET /sessions` — list session summaries
//! - `POST /sessions` — create a session and run it to its first stop
//! - `GET /sessions/{id}/state` — full [`FoundryState`] snapshot
//! - `POST /sessions/{id}/human_approve` — submit a human decision
//!
//! [`StateTransport`] is the seam between the synchronization layer and the
//! wire: the runner and dispatcher only ever see the trait, so tests can
//! substitute scripted fakes without a server. [`FoundryClient`] is the real
//! implementation over `reqwest`.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::FoundryConfig;
use crate::state::{FoundryState, SessionSummary};
use crate::types::{HumanAction, SessionStatus};

/// Error taxonomy for everything that crosses the wire.
///
/// The distinction matters to the scheduler: `NotFound` is fatal for a view
/// and stops polling, `Transient` keeps the fixed-delay retry going, and
/// `DispatchFailed` is surfaced synchronously to the caller with no automatic
/// retry.
#[derive(Debug, Error, Diagnostic)]
pub enum FoundryError {
    #[error("session not found: {session_id}")]
    #[diagnostic(
        code(foundrysync::client::not_found),
        help("The session id is unknown to the engine; stop polling this view.")
    )]
    NotFound { session_id: String },

    #[error("transient engine error: {reason}")]
    #[diagnostic(code(foundrysync::client::transient))]
    Transient { reason: String },

    #[error("human action dispatch failed: {reason}")]
    #[diagnostic(
        code(foundrysync::client::dispatch_failed),
        help("The edit buffer and comments are preserved; retry explicitly.")
    )]
    DispatchFailed { reason: String },
}

impl FoundryError {
    /// `true` when the next scheduled poll should retry automatically.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

// Network-level failures on the poll path are transient by definition; the
// dispatch path remaps them itself.
impl From<reqwest::Error> for FoundryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transient {
            reason: err.to_string(),
        }
    }
}

/// Body of `POST /sessions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub user_intent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
}

/// Response of `POST /sessions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub status: SessionStatus,
}

/// Body of `POST /sessions/{id}/human_approve`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HumanApproveRequest {
    /// The (possibly human-edited) draft buffer content.
    pub new_content: String,
    pub action: HumanAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Response of `POST /sessions/{id}/human_approve`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApproveAck {
    pub status: SessionStatus,
    pub session_id: String,
}

/// The wire seam consumed by the runner and dispatcher.
#[async_trait]
pub trait StateTransport: Send + Sync + 'static {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, FoundryError>;

    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, FoundryError>;

    async fn fetch_state(&self, session_id: &str) -> Result<FoundryState, FoundryError>;

    async fn human_approve(
        &self,
        session_id: &str,
        request: &HumanApproveRequest,
    ) -> Result<ApproveAck, FoundryError>;
}

/// `reqwest`-backed [`StateTransport`] implementation.
#[derive(Clone, Debug)]
pub struct FoundryClient {
    base_url: String,
    http: reqwest::Client,
}

impl FoundryClient {
    /// Build a client from configuration. Fails only if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: &FoundryConfig) -> Result<Self, FoundryError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FoundryError::Transient {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-success poll response to the taxonomy: 404 is fatal for the
    /// session id, everything else is retried on the next scheduled poll.
    fn check_poll_response(
        response: reqwest::Response,
        session_id: &str,
    ) -> Result<reqwest::Response, FoundryError> {
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FoundryError::NotFound {
                session_id: session_id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(FoundryError::Transient {
                reason: format!("engine returned {}", response.status()),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl StateTransport for FoundryClient {
    #[instrument(skip(self))]
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, FoundryError> {
        let response = self.http.get(self.url("/sessions")).send().await?;
        if !response.status().is_success() {
            return Err(FoundryError::Transient {
                reason: format!("engine returned {}", response.status()),
            });
        }
        Ok(response.json().await?)
    }

    #[instrument(skip(self, request), fields(intent = %request.user_intent))]
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, FoundryError> {
        let response = self
            .http
            .post(self.url("/sessions"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FoundryError::Transient {
                reason: format!("engine returned {}", response.status()),
            });
        }
        let created: CreateSessionResponse = response.json().await?;
        debug!(session_id = %created.session_id, status = %created.status, "session created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn fetch_state(&self, session_id: &str) -> Result<FoundryState, FoundryError> {
        let response = self
            .http
            .get(self.url(&format!("/sessions/{session_id}/state")))
            .send()
            .await?;
        let response = Self::check_poll_response(response, session_id)?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, request), fields(action = %request.action))]
    async fn human_approve(
        &self,
        session_id: &str,
        request: &HumanApproveRequest,
    ) -> Result<ApproveAck, FoundryError> {
        let response = self
            .http
            .post(self.url(&format!("/sessions/{session_id}/human_approve")))
            .json(request)
            .send()
            .await
            .map_err(|e| FoundryError::DispatchFailed {
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FoundryError::DispatchFailed {
                reason: format!("engine returned {status}: {body}"),
            });
        }
        response
            .json()
            .await
            .map_err(|e| FoundryError::DispatchFailed {
                reason: format!("malformed approve response: {e}"),
            })
    }
}
