use crate::{
    dao::models::CourseDocument,
    state::{player::checked_value, scorecard::ScorecardError},
};

/// Course definition loaded from the external catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: String,
    hole_labels: Vec<String>,
    pars: Vec<u32>,
    enabled: bool,
}

impl Course {
    /// Build a course, checking that every hole has both a label and a par.
    pub fn new(
        id: impl Into<String>,
        hole_labels: Vec<String>,
        pars: Vec<u32>,
        enabled: bool,
    ) -> Result<Self, ScorecardError> {
        let id = id.into();
        if hole_labels.is_empty() {
            return Err(ScorecardError::EmptyCourse(id));
        }
        if hole_labels.len() != pars.len() {
            return Err(ScorecardError::LengthMismatch {
                what: "course pars",
                expected: hole_labels.len(),
                actual: pars.len(),
            });
        }

        for par in &pars {
            checked_value(i64::from(*par))?;
        }

        Ok(Self {
            id,
            hole_labels,
            pars,
            enabled,
        })
    }

    /// Course with labels `1..=n`, mostly useful for tests and demos.
    pub fn numbered(id: impl Into<String>, pars: Vec<u32>) -> Result<Self, ScorecardError> {
        let labels = (1..=pars.len()).map(|n| n.to_string()).collect();
        Self::new(id, labels, pars, true)
    }

    /// Catalog identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Hole labels in play order.
    pub fn hole_labels(&self) -> &[String] {
        &self.hole_labels
    }

    /// Catalog pars, before any per-scorecard override.
    pub fn pars(&self) -> &[u32] {
        &self.pars
    }

    /// Number of holes.
    pub fn hole_count(&self) -> usize {
        self.pars.len()
    }

    /// Whether the course may start a new scorecard.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl TryFrom<CourseDocument> for Course {
    type Error = ScorecardError;

    fn try_from(value: CourseDocument) -> Result<Self, Self::Error> {
        Course::new(
            value.course_id,
            value.hole_numbers,
            value.hole_pars,
            value.enabled,
        )
    }
}

impl From<&Course> for CourseDocument {
    fn from(value: &Course) -> Self {
        Self {
            course_id: value.id.clone(),
            hole_numbers: value.hole_labels.clone(),
            hole_pars: value.pars.clone(),
            enabled: value.enabled,
        }
    }
}
