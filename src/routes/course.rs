use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::course::{CourseSummary, OpenUserspaceRequest, UserspaceSummary},
    error::AppError,
    services::course_service,
    state::SharedState,
};

/// Routes opening a userspace and reading its catalog.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/userspace", post(open_userspace))
        .route("/courses", get(list_courses))
}

/// Derive the userspace from a passphrase and load its course catalog.
#[utoipa::path(
    post,
    path = "/userspace",
    tag = "courses",
    request_body = OpenUserspaceRequest,
    responses(
        (status = 200, description = "Userspace opened", body = UserspaceSummary),
        (status = 400, description = "Blank passphrase"),
        (status = 503, description = "Remote store unavailable")
    )
)]
pub async fn open_userspace(
    State(state): State<SharedState>,
    Json(payload): Json<OpenUserspaceRequest>,
) -> Result<Json<UserspaceSummary>, AppError> {
    payload.validate()?;
    let summary = course_service::open_userspace(&state, payload).await?;
    Ok(Json(summary))
}

/// List the courses of the open userspace.
#[utoipa::path(
    get,
    path = "/courses",
    tag = "courses",
    responses((status = 200, description = "Loaded courses", body = [CourseSummary]))
)]
pub async fn list_courses(State(state): State<SharedState>) -> Json<Vec<CourseSummary>> {
    Json(course_service::list_courses(&state).await)
}
