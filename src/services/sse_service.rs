use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::watch;
use tokio_stream::{StreamExt, wrappers::WatchStream};
use tracing::warn;

use crate::{dto::sse::SaveStatusEvent, services::save_coordinator::SaveStatus};

/// SSE event name carrying [`SaveStatusEvent`] payloads.
pub const SAVE_STATUS_EVENT: &str = "save_status";

/// Convert a save status watcher into an SSE response.
///
/// The current status is sent immediately, then every change.
pub fn to_sse_stream(
    receiver: watch::Receiver<SaveStatus>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::new(receiver).filter_map(|status| status_event(status).map(Ok));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn status_event(status: SaveStatus) -> Option<Event> {
    match Event::default()
        .event(SAVE_STATUS_EVENT)
        .json_data(SaveStatusEvent { status })
    {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(error = %err, ?status, "failed to encode save status event");
            None
        }
    }
}
