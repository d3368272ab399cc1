use tracing::{info, warn};

use crate::{
    dao::{gateway::DocumentKey, models::CourseCatalogDocument},
    dto::course::{CourseSummary, OpenUserspaceRequest, UserspaceSummary},
    error::ServiceError,
    state::{SharedState, course::Course, ids::UserspaceId},
};

/// Derive the userspace from a passphrase and load its course catalog.
///
/// A userspace without a stored catalog opens with no courses. Catalog entries that do not
/// describe a playable course are skipped.
pub async fn open_userspace(
    state: &SharedState,
    request: OpenUserspaceRequest,
) -> Result<UserspaceSummary, ServiceError> {
    let userspace = UserspaceId::from_passphrase(&request.passphrase)?;

    let catalog = match state
        .gateway()
        .download(DocumentKey::courses(userspace.as_str()))
        .await?
    {
        Some(data) => serde_json::from_value::<CourseCatalogDocument>(data).map_err(|err| {
            ServiceError::InvalidState(format!("course catalog is malformed: {err}"))
        })?,
        None => {
            info!(userspace = %userspace, "no course catalog stored for userspace");
            CourseCatalogDocument::default()
        }
    };

    let mut courses = Vec::with_capacity(catalog.courses.len());
    for doc in catalog.courses {
        let course_id = doc.course_id.clone();
        match Course::try_from(doc) {
            Ok(course) => courses.push(course),
            Err(err) => warn!(course_id = %course_id, error = %err, "skipping invalid course"),
        }
    }

    let summary = UserspaceSummary {
        userspace_id: userspace.to_string(),
        courses: courses.iter().map(CourseSummary::from).collect(),
    };
    info!(userspace = %userspace, courses = courses.len(), "userspace opened");

    *state.userspace().write().await = Some(userspace);
    *state.courses().write().await = courses;
    Ok(summary)
}

/// Courses of the open userspace.
pub async fn list_courses(state: &SharedState) -> Vec<CourseSummary> {
    let courses = state.courses().read().await;
    courses.iter().map(CourseSummary::from).collect()
}

/// Look up a loaded course by id.
pub(crate) async fn find_course(state: &SharedState, id: &str) -> Result<Course, ServiceError> {
    let courses = state.courses().read().await;
    courses
        .iter()
        .find(|course| course.id() == id)
        .cloned()
        .ok_or_else(|| ServiceError::NotFound(format!("course `{id}` is not in the catalog")))
}
