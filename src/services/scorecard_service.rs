//! Mutation entry points for the active scorecard.
//!
//! Each operation holds the scorecard write guard until the aggregate is consistent again.
//! Saves serialize under the guard and upload after it is released.

use tracing::{debug, info, warn};

use crate::{
    dao::{gateway::DocumentKey, models::ScorecardDocument},
    dto::scorecard::{
        AddPlayerRequest, CreateScorecardRequest, NotesRequest, PlayerView, RenamePlayerRequest,
        SaveAccepted, ScorecardView, SetHoleScoreRequest,
    },
    error::ServiceError,
    services::{course_service, save_coordinator::{SaveCoordinator, SaveStatus}},
    state::{
        SharedState,
        ids::ScorecardId,
        scorecard::{PlayerSelector, ScorecardAggregate},
    },
};

/// Start a scorecard on a catalog course and make it the active one.
pub async fn create_scorecard(
    state: &SharedState,
    request: CreateScorecardRequest,
) -> Result<ScorecardView, ServiceError> {
    let course = course_service::find_course(state, request.course_id.trim()).await?;
    let userspace = state.userspace().read().await.clone();

    let mut scorecard = ScorecardAggregate::new(course, userspace.as_ref())?;
    let mut names = request.player_names.into_iter();
    if let Some(first) = names.next() {
        scorecard.rename_player(1, &first)?;
    }
    for name in names {
        scorecard.add_player(Some(name));
    }

    info!(
        scorecard_id = %scorecard.id(),
        course_id = scorecard.course().id(),
        players = scorecard.players().len(),
        "scorecard created"
    );
    let view = ScorecardView::new(&scorecard, state.saver().status());
    *state.scorecard().write().await = Some(scorecard);
    Ok(view)
}

/// Fetch a stored scorecard and make it the active one.
///
/// A copy still waiting in the fallback queue is newer than the remote one and wins.
pub async fn load_scorecard(state: &SharedState, id: &str) -> Result<ScorecardView, ServiceError> {
    let id = ScorecardId::parse(id)?;

    let queue = state.saver().queue();
    let queued = match queue.get(&queue.key_for(id.as_str())).await {
        Ok(payload) => payload,
        Err(err) => {
            warn!(scorecard_id = %id, error = %err, "failed to read fallback queue; using remote copy");
            None
        }
    };

    let document: ScorecardDocument = match queued {
        Some(payload) => {
            info!(scorecard_id = %id, "loading unsynced copy from the fallback queue");
            serde_json::from_str(&payload).map_err(|err| {
                ServiceError::InvalidState(format!("queued scorecard is malformed: {err}"))
            })?
        }
        None => {
            let data = state
                .gateway()
                .download(DocumentKey::scorecard(id.as_str()))
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("scorecard `{id}` does not exist")))?;
            serde_json::from_value(data).map_err(|err| {
                ServiceError::InvalidState(format!("stored scorecard is malformed: {err}"))
            })?
        }
    };

    let scorecard = ScorecardAggregate::try_from(document)?;
    if scorecard.id() != &id {
        return Err(ServiceError::InvalidState(format!(
            "stored document carries id `{}` instead of `{id}`",
            scorecard.id()
        )));
    }

    info!(scorecard_id = %id, "scorecard loaded");
    let view = ScorecardView::new(&scorecard, state.saver().status());
    *state.scorecard().write().await = Some(scorecard);
    Ok(view)
}

/// Projection of the active scorecard.
pub async fn view_scorecard(state: &SharedState) -> Result<ScorecardView, ServiceError> {
    let guard = state.scorecard().read().await;
    let scorecard = guard.as_ref().ok_or_else(no_active_scorecard)?;
    Ok(ScorecardView::new(scorecard, state.saver().status()))
}

/// Record the score of `hole` for player `number`.
pub async fn set_hole_score(
    state: &SharedState,
    number: u32,
    hole: usize,
    request: SetHoleScoreRequest,
) -> Result<PlayerView, ServiceError> {
    with_scorecard(state, |scorecard| {
        let rank = scorecard.set_hole_score(number, hole, request.value, &request.qualifiers)?;
        debug!(player = number, hole, value = request.value, rank = rank.as_str(), "hole score set");
        player_view(scorecard, number)
    })
    .await
}

/// Override the par of `hole` on the active scorecard.
pub async fn set_hole_par(
    state: &SharedState,
    hole: usize,
    value: i64,
) -> Result<ScorecardView, ServiceError> {
    with_scorecard(state, |scorecard| {
        scorecard.set_hole_par(hole, value)?;
        debug!(hole, value, par_total = scorecard.par_total().value(), "hole par overridden");
        Ok(ScorecardView::new(scorecard, state.saver().status()))
    })
    .await
}

/// Append a player.
pub async fn add_player(
    state: &SharedState,
    request: AddPlayerRequest,
) -> Result<ScorecardView, ServiceError> {
    with_scorecard(state, |scorecard| {
        let number = scorecard.add_player(request.name);
        debug!(player = number, "player added");
        Ok(ScorecardView::new(scorecard, state.saver().status()))
    })
    .await
}

/// Remove the last player; the only remaining player is kept.
pub async fn remove_player(state: &SharedState) -> Result<ScorecardView, ServiceError> {
    with_scorecard(state, |scorecard| {
        if !scorecard.remove_player() {
            debug!("last remaining player kept");
        }
        Ok(ScorecardView::new(scorecard, state.saver().status()))
    })
    .await
}

/// Rename player `number`.
pub async fn rename_player(
    state: &SharedState,
    number: u32,
    request: RenamePlayerRequest,
) -> Result<PlayerView, ServiceError> {
    with_scorecard(state, |scorecard| {
        scorecard.rename_player(number, &request.name)?;
        player_view(scorecard, number)
    })
    .await
}

/// Replace the notes of the active scorecard.
pub async fn set_notes(
    state: &SharedState,
    request: NotesRequest,
) -> Result<ScorecardView, ServiceError> {
    with_scorecard(state, |scorecard| {
        scorecard.set_notes(request.notes);
        Ok(ScorecardView::new(scorecard, state.saver().status()))
    })
    .await
}

/// Serialize the active scorecard and upload it in the background.
pub async fn save_scorecard(state: &SharedState) -> Result<SaveAccepted, ServiceError> {
    let (id, payload) = with_scorecard(state, |scorecard| {
        scorecard.update_par_total();
        scorecard.update_score_total(PlayerSelector::All)?;
        Ok(SaveCoordinator::serialize(scorecard)?)
    })
    .await?;

    info!(scorecard_id = %id, bytes = payload.len(), "save requested");
    state.saver().spawn_save(id.clone(), payload);

    Ok(SaveAccepted {
        scorecard_id: id.to_string(),
        status: SaveStatus::Saving,
    })
}

/// Run `work` on the active scorecard under the write guard.
async fn with_scorecard<T>(
    state: &SharedState,
    work: impl FnOnce(&mut ScorecardAggregate) -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    let mut guard = state.scorecard().write().await;
    let scorecard = guard.as_mut().ok_or_else(no_active_scorecard)?;
    work(scorecard)
}

fn player_view(scorecard: &ScorecardAggregate, number: u32) -> Result<PlayerView, ServiceError> {
    scorecard
        .player(number)
        .map(PlayerView::from)
        .ok_or_else(|| ServiceError::NotFound(format!("player {number} does not exist")))
}

fn no_active_scorecard() -> ServiceError {
    ServiceError::InvalidState("no scorecard is active".into())
}
