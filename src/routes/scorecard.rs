use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use validator::Validate;

use crate::{
    dto::scorecard::{
        AddPlayerRequest, CreateScorecardRequest, NotesRequest, PlayerView, RenamePlayerRequest,
        SaveAccepted, ScorecardView, SetHoleScoreRequest, SetParRequest,
    },
    error::AppError,
    services::scorecard_service,
    state::SharedState,
};

/// Routes creating, loading, editing and saving the active scorecard.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/scorecards", post(create_scorecard))
        .route("/scorecards/{id}/load", post(load_scorecard))
        .route("/scorecard", get(view_scorecard))
        .route(
            "/scorecard/players/{number}/holes/{hole}",
            put(set_hole_score),
        )
        .route("/scorecard/pars/{hole}", put(set_hole_par))
        .route("/scorecard/players", post(add_player).delete(remove_player))
        .route("/scorecard/players/{number}", put(rename_player))
        .route("/scorecard/notes", put(set_notes))
        .route("/scorecard/save", post(save_scorecard))
}

/// Start a scorecard on a catalog course.
#[utoipa::path(
    post,
    path = "/scorecards",
    tag = "scorecard",
    request_body = CreateScorecardRequest,
    responses(
        (status = 200, description = "Scorecard created", body = ScorecardView),
        (status = 404, description = "Unknown course"),
        (status = 409, description = "Course disabled")
    )
)]
pub async fn create_scorecard(
    State(state): State<SharedState>,
    Json(payload): Json<CreateScorecardRequest>,
) -> Result<Json<ScorecardView>, AppError> {
    payload.validate()?;
    let view = scorecard_service::create_scorecard(&state, payload).await?;
    Ok(Json(view))
}

/// Load a stored scorecard and make it the active one.
#[utoipa::path(
    post,
    path = "/scorecards/{id}/load",
    tag = "scorecard",
    params(("id" = String, Path, description = "Identifier of the scorecard to load")),
    responses(
        (status = 200, description = "Scorecard loaded", body = ScorecardView),
        (status = 404, description = "Scorecard not found")
    )
)]
pub async fn load_scorecard(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ScorecardView>, AppError> {
    let view = scorecard_service::load_scorecard(&state, &id).await?;
    Ok(Json(view))
}

/// Return the active scorecard.
#[utoipa::path(
    get,
    path = "/scorecard",
    tag = "scorecard",
    responses(
        (status = 200, description = "Active scorecard", body = ScorecardView),
        (status = 409, description = "No scorecard is active")
    )
)]
pub async fn view_scorecard(
    State(state): State<SharedState>,
) -> Result<Json<ScorecardView>, AppError> {
    Ok(Json(scorecard_service::view_scorecard(&state).await?))
}

/// Record the score of one hole for one player.
#[utoipa::path(
    put,
    path = "/scorecard/players/{number}/holes/{hole}",
    tag = "scorecard",
    params(
        ("number" = u32, Path, description = "1-based player number"),
        ("hole" = usize, Path, description = "0-based hole index")
    ),
    request_body = SetHoleScoreRequest,
    responses(
        (status = 200, description = "Updated player row", body = PlayerView),
        (status = 400, description = "Value outside 0..=999 or hole out of range"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn set_hole_score(
    State(state): State<SharedState>,
    Path((number, hole)): Path<(u32, usize)>,
    Json(payload): Json<SetHoleScoreRequest>,
) -> Result<Json<PlayerView>, AppError> {
    payload.validate()?;
    let view = scorecard_service::set_hole_score(&state, number, hole, payload).await?;
    Ok(Json(view))
}

/// Override the par of one hole for this scorecard.
#[utoipa::path(
    put,
    path = "/scorecard/pars/{hole}",
    tag = "scorecard",
    params(("hole" = usize, Path, description = "0-based hole index")),
    request_body = SetParRequest,
    responses(
        (status = 200, description = "Scorecard with reclassified players", body = ScorecardView),
        (status = 400, description = "Value outside 0..=999 or hole out of range")
    )
)]
pub async fn set_hole_par(
    State(state): State<SharedState>,
    Path(hole): Path<usize>,
    Json(payload): Json<SetParRequest>,
) -> Result<Json<ScorecardView>, AppError> {
    payload.validate()?;
    let view = scorecard_service::set_hole_par(&state, hole, payload.value).await?;
    Ok(Json(view))
}

/// Append a player.
#[utoipa::path(
    post,
    path = "/scorecard/players",
    tag = "scorecard",
    request_body = AddPlayerRequest,
    responses((status = 200, description = "Scorecard with the new player", body = ScorecardView))
)]
pub async fn add_player(
    State(state): State<SharedState>,
    Json(payload): Json<AddPlayerRequest>,
) -> Result<Json<ScorecardView>, AppError> {
    payload.validate()?;
    Ok(Json(scorecard_service::add_player(&state, payload).await?))
}

/// Remove the last player. The only remaining player is never removed.
#[utoipa::path(
    delete,
    path = "/scorecard/players",
    tag = "scorecard",
    responses((status = 200, description = "Scorecard after removal", body = ScorecardView))
)]
pub async fn remove_player(
    State(state): State<SharedState>,
) -> Result<Json<ScorecardView>, AppError> {
    Ok(Json(scorecard_service::remove_player(&state).await?))
}

/// Rename a player.
#[utoipa::path(
    put,
    path = "/scorecard/players/{number}",
    tag = "scorecard",
    params(("number" = u32, Path, description = "1-based player number")),
    request_body = RenamePlayerRequest,
    responses(
        (status = 200, description = "Renamed player", body = PlayerView),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn rename_player(
    State(state): State<SharedState>,
    Path(number): Path<u32>,
    Json(payload): Json<RenamePlayerRequest>,
) -> Result<Json<PlayerView>, AppError> {
    payload.validate()?;
    Ok(Json(
        scorecard_service::rename_player(&state, number, payload).await?,
    ))
}

/// Replace the notes.
#[utoipa::path(
    put,
    path = "/scorecard/notes",
    tag = "scorecard",
    request_body = NotesRequest,
    responses((status = 200, description = "Scorecard with new notes", body = ScorecardView))
)]
pub async fn set_notes(
    State(state): State<SharedState>,
    Json(payload): Json<NotesRequest>,
) -> Result<Json<ScorecardView>, AppError> {
    payload.validate()?;
    Ok(Json(scorecard_service::set_notes(&state, payload).await?))
}

/// Trigger a save. The upload continues in the background; follow `/sse/save-status`.
#[utoipa::path(
    post,
    path = "/scorecard/save",
    tag = "scorecard",
    responses(
        (status = 202, description = "Save started", body = SaveAccepted),
        (status = 409, description = "No scorecard is active")
    )
)]
pub async fn save_scorecard(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<SaveAccepted>), AppError> {
    let accepted = scorecard_service::save_scorecard(&state).await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}
