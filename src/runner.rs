//! The per-view session runner: one cooperative task driving
//! fetch → reconcile → derive, interleaved with user-triggered dispatch.
//!
//! [`SessionRunner`] owns the only timer and the only in-flight fetch for its
//! session view, so the layer's exclusivity guarantees hold structurally:
//!
//! - at most one fetch in flight (the runner holds a single boxed future);
//! - at most one dispatch in flight (dispatch is awaited inline on the
//!   runner's own loop);
//! - snapshots applied strictly in fetch-completion order (the loop is the
//!   only applier);
//! - switching sessions cancels the timer and drops the in-flight fetch, and
//!   a response that still arrives for a superseded id is discarded inside
//!   [`ControlState::apply`].
//!
//! Dropping the [`SessionHandle`] disconnects the command channel, which ends
//! the loop and releases the timer.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use foundrysync::client::{FoundryClient, StateTransport};
//! use foundrysync::config::FoundryConfig;
//! use foundrysync::runner::SessionRunner;
//! use foundrysync::types::HumanAction;
//!
//! # async fn example() -> Result<(), foundrysync::client::FoundryError> {
//! let config = FoundryConfig::from_env();
//! let transport: Arc<dyn StateTransport> = Arc::new(FoundryClient::new(&config)?);
//!
//! let (handle, updates) = SessionRunner::spawn(transport, "session-1", config.poll_interval);
//!
//! // Render loop: each update carries the derived view model.
//! tokio::spawn(async move {
//!     while let Ok(update) = updates.recv_async().await {
//!         println!("{}: {:?}", update.session_id, update.view);
//!     }
//! });
//!
//! handle.edit_buffer("Step 1 revised");
//! let ack = handle.dispatch(HumanAction::RequestRevision).await?;
//! println!("engine moved to {}", ack.status);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::client::{ApproveAck, FoundryError, HumanApproveRequest, StateTransport};
use crate::control::{ControlState, Effect, ViewEvent};
use crate::state::FoundryState;
use crate::view::SessionViewModel;

/// Commands a view can send to its runner.
#[derive(Debug)]
enum Command {
    Resume,
    EditBuffer(String),
    EditComments(String),
    Dispatch {
        action: crate::types::HumanAction,
        reply: flume::Sender<Result<ApproveAck, FoundryError>>,
    },
    SwitchSession(String),
    Shutdown,
}

/// One publishable frame of client state, emitted after every applied event.
#[derive(Clone, Debug)]
pub struct ViewUpdate {
    pub session_id: String,
    /// Derived presentation fields; `None` before the first good snapshot.
    pub view: Option<SessionViewModel>,
    pub buffer_text: String,
    pub comments: String,
    pub last_error: Option<String>,
    pub dispatch_in_flight: bool,
    /// UI gate for the four action controls.
    pub can_dispatch: bool,
}

/// Cheap, clonable handle for steering a [`SessionRunner`].
#[derive(Clone, Debug)]
pub struct SessionHandle {
    commands: flume::Sender<Command>,
}

impl SessionHandle {
    /// Fire one immediate fetch regardless of the current schedule, then let
    /// normal scheduling resume from the result. Called after a successful
    /// human action; also usable to restart a view stopped by `NotFound`.
    pub fn resume(&self) {
        let _ = self.commands.send(Command::Resume);
    }

    /// Replace the draft buffer text with the user's edit.
    pub fn edit_buffer(&self, text: impl Into<String>) {
        let _ = self.commands.send(Command::EditBuffer(text.into()));
    }

    /// Replace the comments field.
    pub fn edit_comments(&self, text: impl Into<String>) {
        let _ = self.commands.send(Command::EditComments(text.into()));
    }

    /// Submit one human action with the current buffer and comments.
    ///
    /// Resolves when the engine replies. On success the runner has already
    /// cleared comments, invalidated the cached snapshot, and fired the
    /// resume fetch; on failure buffer and comments are untouched and no
    /// automatic retry happens.
    pub async fn dispatch(
        &self,
        action: crate::types::HumanAction,
    ) -> Result<ApproveAck, FoundryError> {
        let (reply, response) = flume::bounded(1);
        self.commands
            .send(Command::Dispatch { action, reply })
            .map_err(|_| FoundryError::DispatchFailed {
                reason: "session runner is gone".to_string(),
            })?;
        response
            .recv_async()
            .await
            .map_err(|_| FoundryError::DispatchFailed {
                reason: "session runner dropped the reply".to_string(),
            })?
    }

    /// Point the view at a different session id. Cancels the pending timer,
    /// drops any in-flight fetch, destroys the old buffer, and fetches the
    /// new session immediately.
    pub fn switch_session(&self, session_id: impl Into<String>) {
        let _ = self.commands.send(Command::SwitchSession(session_id.into()));
    }

    /// Stop the runner. Dropping every handle has the same effect.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

/// The actor. Create via [`SessionRunner::spawn`].
pub struct SessionRunner {
    transport: Arc<dyn StateTransport>,
    control: ControlState,
    commands: flume::Receiver<Command>,
    updates: flume::Sender<ViewUpdate>,
    /// Armed poll timer, if any.
    deadline: Option<Instant>,
    /// The single permitted in-flight fetch.
    in_flight: Option<BoxFuture<'static, Result<FoundryState, FoundryError>>>,
}

impl SessionRunner {
    /// Spawn a runner for `session_id` on the current tokio runtime.
    ///
    /// The first fetch is issued immediately; afterwards scheduling follows
    /// the status of each snapshot. Returns the steering handle and the
    /// stream of [`ViewUpdate`] frames.
    pub fn spawn(
        transport: Arc<dyn StateTransport>,
        session_id: impl Into<String>,
        poll_interval: Duration,
    ) -> (SessionHandle, flume::Receiver<ViewUpdate>) {
        let (command_tx, command_rx) = flume::unbounded();
        let (update_tx, update_rx) = flume::unbounded();
        let runner = Self {
            transport,
            control: ControlState::new(session_id, poll_interval),
            commands: command_rx,
            updates: update_tx,
            deadline: None,
            in_flight: None,
        };
        tokio::spawn(runner.run());
        (
            SessionHandle {
                commands: command_tx,
            },
            update_rx,
        )
    }

    async fn run(mut self) {
        self.start_fetch();
        loop {
            let fetching = self.in_flight.is_some();
            let timer_armed = self.deadline.is_some() && !fetching;
            let deadline = self.deadline.unwrap_or_else(Instant::now);
            tokio::select! {
                cmd = self.commands.recv_async() => {
                    match cmd {
                        Err(_) | Ok(Command::Shutdown) => break,
                        Ok(cmd) => self.handle_command(cmd).await,
                    }
                }
                result = async {
                    match self.in_flight.as_mut() {
                        Some(fetch) => fetch.await,
                        None => std::future::pending().await,
                    }
                }, if fetching => {
                    self.in_flight = None;
                    let event = match result {
                        Ok(snapshot) => ViewEvent::SnapshotReceived(snapshot),
                        Err(err) => {
                            warn!(session_id = %self.control.session_id(), error = %err, "poll failed");
                            ViewEvent::PollFailed(err)
                        }
                    };
                    let effects = self.control.apply(event);
                    self.perform(effects);
                    self.publish();
                }
                _ = tokio::time::sleep_until(deadline), if timer_armed => {
                    self.deadline = None;
                    self.start_fetch();
                }
            }
        }
        debug!(session_id = %self.control.session_id(), "session runner stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Resume => {
                self.perform(vec![Effect::FetchNow]);
            }
            Command::EditBuffer(text) => {
                let effects = self.control.apply(ViewEvent::BufferEdited(text));
                self.perform(effects);
                self.publish();
            }
            Command::EditComments(text) => {
                let effects = self.control.apply(ViewEvent::CommentsEdited(text));
                self.perform(effects);
                self.publish();
            }
            Command::SwitchSession(session_id) => {
                let effects = self.control.apply(ViewEvent::SessionChanged(session_id));
                self.perform(effects);
                self.publish();
            }
            Command::Dispatch { action, reply } => {
                self.handle_dispatch(action, reply).await;
            }
            // Shutdown is intercepted in `run()` before reaching here.
            Command::Shutdown => {}
        }
    }

    /// Dispatch is awaited inline on the runner's loop: a second dispatch
    /// command queues behind the first and is rejected while the flag is up,
    /// so two dispatches for the same session never overlap.
    async fn handle_dispatch(
        &mut self,
        action: crate::types::HumanAction,
        reply: flume::Sender<Result<ApproveAck, FoundryError>>,
    ) {
        if self.control.dispatch_in_flight() {
            let _ = reply.send(Err(FoundryError::DispatchFailed {
                reason: "another human action is already in flight".to_string(),
            }));
            return;
        }
        let effects = self.control.apply(ViewEvent::DispatchStarted);
        self.perform(effects);
        self.publish();

        let comments = self.control.comments();
        let request = HumanApproveRequest {
            new_content: self.control.buffer_text().to_string(),
            action,
            comments: (!comments.is_empty()).then(|| comments.to_string()),
        };
        let session_id = self.control.session_id().to_string();
        let result = self.transport.human_approve(&session_id, &request).await;

        let event = match &result {
            Ok(ack) => ViewEvent::DispatchSucceeded(ack.clone()),
            Err(err) => ViewEvent::DispatchFailed(err.to_string()),
        };
        let effects = self.control.apply(event);
        self.perform(effects);
        self.publish();
        let _ = reply.send(result);
    }

    fn start_fetch(&mut self) {
        let transport = Arc::clone(&self.transport);
        let session_id = self.control.session_id().to_string();
        self.in_flight =
            Some(async move { transport.fetch_state(&session_id).await }.boxed());
    }

    fn perform(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SchedulePoll(delay) => {
                    self.deadline = Some(Instant::now() + delay);
                }
                Effect::CancelPoll => {
                    self.deadline = None;
                    // Dropping the future cancels the underlying request;
                    // a response already on the wire is discarded by id
                    // inside the transition function.
                    self.in_flight = None;
                }
                Effect::FetchNow => {
                    self.deadline = None;
                    self.start_fetch();
                }
            }
        }
    }

    fn publish(&self) {
        let update = ViewUpdate {
            session_id: self.control.session_id().to_string(),
            view: self.control.view(),
            buffer_text: self.control.buffer_text().to_string(),
            comments: self.control.comments().to_string(),
            last_error: self.control.last_error().map(str::to_string),
            dispatch_in_flight: self.control.dispatch_in_flight(),
            can_dispatch: self.control.can_dispatch(),
        };
        let _ = self.updates.send(update);
    }
}
