use serde::Serialize;
use utoipa::ToSchema;

use crate::services::save_coordinator::SaveStatus;

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Broadcast whenever the save pipeline changes state.
pub struct SaveStatusEvent {
    pub status: SaveStatus,
}
