/// Userspace and course catalog loading.
pub mod course_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Upload, fallback queue and retry orchestration.
pub mod save_coordinator;
/// Scorecard mutation entry points.
pub mod scorecard_service;
/// Server-Sent Events streaming of the save status.
pub mod sse_service;
