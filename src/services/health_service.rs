use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the remote store and report the fallback queue backlog.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let saver = state.saver();
    let pending = match saver.queue().len().await {
        Ok(pending) => Some(pending),
        Err(err) => {
            warn!(error = %err, "failed to read fallback queue");
            None
        }
    };

    match state.gateway().health_check().await {
        Ok(()) => HealthResponse::ok(pending, saver.status()),
        Err(err) => {
            warn!(error = %err, "remote store health check failed");
            HealthResponse::degraded(pending, saver.status())
        }
    }
}
