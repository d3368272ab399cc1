use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/save-status",
    tag = "sse",
    responses((status = 200, description = "Save status SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream save status changes so clients can show saving and queued indicators.
pub async fn save_status_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    info!("New save status SSE connection");
    sse_service::to_sse_stream(state.saver().subscribe())
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/save-status", get(save_status_stream))
}
