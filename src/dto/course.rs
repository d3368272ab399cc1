use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::course::Course;

/// Passphrase used to open a userspace and fetch its course catalog.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct OpenUserspaceRequest {
    #[validate(length(min = 1, max = 256))]
    pub passphrase: String,
}

/// Userspace opened by a passphrase together with its catalog.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserspaceSummary {
    pub userspace_id: String,
    pub courses: Vec<CourseSummary>,
}

/// Public projection of a catalog course.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseSummary {
    pub course_id: String,
    pub hole_numbers: Vec<String>,
    pub hole_pars: Vec<u32>,
    pub par_total: u32,
    pub enabled: bool,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            course_id: course.id().to_string(),
            hole_numbers: course.hole_labels().to_vec(),
            hole_pars: course.pars().to_vec(),
            par_total: course.pars().iter().sum(),
            enabled: course.is_enabled(),
        }
    }
}
