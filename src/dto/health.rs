use serde::Serialize;
use utoipa::ToSchema;

use crate::services::save_coordinator::SaveStatus;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether the remote store answered the probe.
    pub remote_reachable: bool,
    /// Scorecards waiting in the fallback queue, `None` when the queue could not be read.
    pub pending_saves: Option<usize>,
    /// Current state of the save pipeline.
    pub save_status: SaveStatus,
}

impl HealthResponse {
    /// Remote store reachable and nothing is stuck locally.
    pub fn ok(pending_saves: Option<usize>, save_status: SaveStatus) -> Self {
        Self {
            status: "ok".to_string(),
            remote_reachable: true,
            pending_saves,
            save_status,
        }
    }

    /// Remote store unreachable; saves only land in the fallback queue.
    pub fn degraded(pending_saves: Option<usize>, save_status: SaveStatus) -> Self {
        Self {
            status: "degraded".to_string(),
            remote_reachable: false,
            pending_saves,
            save_status,
        }
    }
}
