use std::time::Duration;

use super::error::{RemoteError, RemoteResult};

/// Client-side timeout applied to every remote call unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration describing how to reach the remote store.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl RemoteConfig {
    /// Construct a configuration for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> RemoteResult<Self> {
        let base_url =
            std::env::var("SCORECARD_REMOTE_URL").map_err(|_| RemoteError::MissingEnvVar {
                var: "SCORECARD_REMOTE_URL",
            })?;

        let mut config = Self::new(base_url);

        if let Some(seconds) = std::env::var("SCORECARD_REMOTE_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
        {
            config = config.with_timeout(Duration::from_secs(seconds));
        }

        Ok(config)
    }
}
