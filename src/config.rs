//! Client configuration with env resolution.

use std::time::Duration;

/// Fixed delay between polls after a snapshot whose status keeps polling
/// alive. Per the observed engine contract; backoff tuning is deliberately
/// not a knob here.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Configuration for [`crate::client::FoundryClient`] and the session runner.
///
/// Resolution order: explicit value, then environment (after a best-effort
/// `.env` load), then default.
///
/// | field             | env var                      | default                  |
/// |-------------------|------------------------------|--------------------------|
/// | `base_url`        | `FOUNDRY_BASE_URL`           | `http://127.0.0.1:8000`  |
/// | `poll_interval`   | `FOUNDRY_POLL_INTERVAL_MS`   | 2000 ms                  |
/// | `request_timeout` | `FOUNDRY_REQUEST_TIMEOUT_MS` | 30000 ms                 |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundryConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for FoundryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            poll_interval: POLL_INTERVAL,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl FoundryConfig {
    /// Resolve configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self {
            base_url: std::env::var("FOUNDRY_BASE_URL").unwrap_or(defaults.base_url),
            poll_interval: env_millis("FOUNDRY_POLL_INTERVAL_MS")
                .unwrap_or(defaults.poll_interval),
            request_timeout: env_millis("FOUNDRY_REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_millis)
}
