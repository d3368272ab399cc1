use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::rank::RankCategory;

/// Course definition as stored in a userspace catalog and embedded in scorecards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseDocument {
    /// Catalog identifier of the course.
    pub course_id: String,
    /// Display label of every hole, in play order.
    pub hole_numbers: Vec<String>,
    /// Par of every hole, same length as `hole_numbers`.
    pub hole_pars: Vec<u32>,
    /// Disabled courses stay in the catalog but cannot start a scorecard.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Catalog payload stored under `courses/{userspace_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseCatalogDocument {
    /// Every course known to the userspace.
    #[serde(default)]
    pub courses: Vec<CourseDocument>,
}

/// A single number with its qualifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreDocument {
    /// Strokes (or par total).
    pub value: u32,
    /// Sorted qualifier characters.
    #[serde(default)]
    pub qualifiers: String,
}

/// One player row of a persisted scorecard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerDocument {
    /// 1-based player number.
    pub player_number: u32,
    /// Display name.
    pub name: String,
    /// One entry per hole.
    pub hole_scores: Vec<ScoreDocument>,
    /// Derived total; recomputed on load.
    pub total_score: ScoreDocument,
    /// Derived statistic counts; recomputed on load.
    #[serde(default)]
    pub stats: IndexMap<RankCategory, u32>,
}

/// Full scorecard document uploaded to `scorecard/{scorecard_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScorecardDocument {
    /// Immutable identity.
    pub scorecard_id: String,
    /// Snapshot of the course the round is played on.
    pub course: CourseDocument,
    /// Hole labels.
    pub hole_numbers: Vec<String>,
    /// Pars as edited on this scorecard.
    pub hole_pars: Vec<u32>,
    /// Derived par total; recomputed on load.
    pub holes_par_total: u32,
    /// Player rows.
    pub players: Vec<PlayerDocument>,
    /// Free text.
    #[serde(default)]
    pub notes: String,
}

/// Outcome flag carried by every remote store response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnvelopeStatus {
    /// Request applied.
    Success,
    /// Request refused; `message` explains why.
    Error,
}

/// Response envelope returned by the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    /// Success or error flag.
    pub status: EnvelopeStatus,
    /// Human readable detail.
    #[serde(default)]
    pub message: Option<String>,
    /// Document body for reads.
    #[serde(default)]
    pub data: Option<Value>,
    /// Identifier echoed back by the store.
    #[serde(default)]
    pub id: Option<String>,
}
