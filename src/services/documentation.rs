use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document for Scorecard Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::save_status_stream,
        crate::routes::course::open_userspace,
        crate::routes::course::list_courses,
        crate::routes::scorecard::create_scorecard,
        crate::routes::scorecard::load_scorecard,
        crate::routes::scorecard::view_scorecard,
        crate::routes::scorecard::set_hole_score,
        crate::routes::scorecard::set_hole_par,
        crate::routes::scorecard::add_player,
        crate::routes::scorecard::remove_player,
        crate::routes::scorecard::rename_player,
        crate::routes::scorecard::set_notes,
        crate::routes::scorecard::save_scorecard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::SaveStatusEvent,
            crate::dto::course::OpenUserspaceRequest,
            crate::dto::course::UserspaceSummary,
            crate::dto::course::CourseSummary,
            crate::dto::scorecard::CreateScorecardRequest,
            crate::dto::scorecard::SetHoleScoreRequest,
            crate::dto::scorecard::SetParRequest,
            crate::dto::scorecard::AddPlayerRequest,
            crate::dto::scorecard::RenamePlayerRequest,
            crate::dto::scorecard::NotesRequest,
            crate::dto::scorecard::ScorecardView,
            crate::dto::scorecard::PlayerView,
            crate::dto::scorecard::HoleScoreView,
            crate::dto::scorecard::ScoreView,
            crate::dto::scorecard::StatView,
            crate::dto::scorecard::SaveAccepted,
            crate::services::save_coordinator::SaveStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "courses", description = "Userspace and course catalog"),
        (name = "scorecard", description = "Scorecard editing and saving"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/sse/save-status",
            "/userspace",
            "/courses",
            "/scorecards",
            "/scorecards/{id}/load",
            "/scorecard",
            "/scorecard/players/{number}/holes/{hole}",
            "/scorecard/pars/{hole}",
            "/scorecard/players",
            "/scorecard/players/{number}",
            "/scorecard/notes",
            "/scorecard/save",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing `{path}`");
        }
    }
}
