//! # FoundrySync: client-side synchronization for the Protocol Foundry
//!
//! FoundrySync lets an operator observe and steer a long-running, server-owned
//! multi-agent workflow — a session that moves through drafting, parallel
//! critique, and human-review phases — without ever losing in-progress input.
//!
//! Three concurrently-evolving pieces of truth get reconciled here:
//!
//! - the authoritative remote session state, fetched by repeated polling;
//! - the human's in-progress edits to the current draft, which must never be
//!   clobbered by a stale or newer poll result;
//! - the rolling per-agent review records, merged deterministically into a
//!   latest-verdict-per-agent map.
//!
//! ## Core Concepts
//!
//! - **Snapshot**: one full [`state::FoundryState`] returned by a fetch; the
//!   client never partially fetches.
//! - **Buffer**: the client-held, possibly-edited copy of the current draft
//!   ([`buffer::DraftBuffer`]), with a strict writer hand-off: the poller
//!   mirrors the server draft until the session parks at `AWAITING_HUMAN`,
//!   then the human's edits are the exclusive writer.
//! - **Transition function**: every event folds through the pure
//!   [`control::ControlState::apply`], which returns scheduling effects
//!   instead of touching timers itself.
//! - **Runner**: [`runner::SessionRunner`], the one cooperative task per open
//!   view that owns the timer, the single in-flight fetch, and dispatch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use foundrysync::client::{FoundryClient, StateTransport};
//! use foundrysync::config::FoundryConfig;
//! use foundrysync::runner::SessionRunner;
//!
//! # async fn example() -> Result<(), foundrysync::client::FoundryError> {
//! let config = FoundryConfig::from_env();
//! let transport: Arc<dyn StateTransport> = Arc::new(FoundryClient::new(&config)?);
//!
//! let (handle, updates) = SessionRunner::spawn(transport, "session-1", config.poll_interval);
//! while let Ok(update) = updates.recv_async().await {
//!     if update.can_dispatch {
//!         // render the action controls enabled
//!     }
//! }
//! # drop(handle);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Session status lifecycle and the four human actions
//! - [`state`] - Serde models for the engine's session snapshots
//! - [`reducers`] - Deterministic latest-per-agent review merges
//! - [`buffer`] - The draft edit buffer and its reconciliation rules
//! - [`view`] - Pure presentation derivations from a snapshot
//! - [`client`] - REST transport, the [`client::StateTransport`] seam, errors
//! - [`control`] - The per-view state machine (events, effects, transitions)
//! - [`store`] - Explicit keyed store for per-session client state
//! - [`runner`] - The cooperative poll/dispatch actor
//! - [`config`] - Environment-resolved client configuration
//! - [`telemetry`] - Tracing subscriber setup

pub mod buffer;
pub mod client;
pub mod config;
pub mod control;
pub mod reducers;
pub mod runner;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod view;
