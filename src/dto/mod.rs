pub mod course;
pub mod health;
pub mod scorecard;
pub mod sse;
pub mod validation;
