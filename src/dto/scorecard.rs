use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dto::validation::validate_qualifiers,
    services::save_coordinator::SaveStatus,
    state::{
        field::ScoreField,
        player::PlayerAggregate,
        rank::RankCategory,
        scorecard::ScorecardAggregate,
    },
};

const MAX_NAME_LEN: u64 = 64;
const MAX_PLAYERS: usize = 16;

/// Payload used to start a scorecard on a catalog course.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScorecardRequest {
    pub course_id: String,
    /// Names of the starting players. The card always starts with at least one player.
    #[serde(default)]
    pub player_names: Vec<String>,
}

impl Validate for CreateScorecardRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.course_id.trim().is_empty() {
            let mut err = ValidationError::new("course_id_empty");
            err.message = Some("Course ID must not be empty".into());
            errors.add("course_id", err);
        }

        if self.player_names.len() > MAX_PLAYERS {
            let mut err = ValidationError::new("player_names_count");
            err.message = Some(
                format!(
                    "At most {MAX_PLAYERS} players are allowed (got {})",
                    self.player_names.len()
                )
                .into(),
            );
            errors.add("player_names", err);
        }

        if self
            .player_names
            .iter()
            .any(|name| name.trim().is_empty() || name.chars().count() as u64 > MAX_NAME_LEN)
        {
            let mut err = ValidationError::new("player_names_length");
            err.message = Some("Player names must be between 1 and 64 characters".into());
            errors.add("player_names", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// New value for one hole of one player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetHoleScoreRequest {
    /// Strokes, between 0 and 999.
    #[validate(range(min = 0, max = 999))]
    pub value: i64,
    #[serde(default)]
    #[validate(custom(function = "validate_qualifiers"))]
    pub qualifiers: String,
}

/// New par for one hole of the active scorecard.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetParRequest {
    #[validate(range(min = 0, max = 999))]
    pub value: i64,
}

/// Player to append to the active scorecard.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct AddPlayerRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
}

/// New display name for a player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RenamePlayerRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Replacement notes for the active scorecard.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct NotesRequest {
    #[validate(length(max = 4000))]
    pub notes: String,
}

/// A value with its qualifiers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoreView {
    pub value: u32,
    pub qualifiers: String,
}

impl From<&ScoreField> for ScoreView {
    fn from(field: &ScoreField) -> Self {
        Self {
            value: field.value(),
            qualifiers: field.qualifiers().to_string(),
        }
    }
}

/// One hole of one player, with its classification.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HoleScoreView {
    pub value: u32,
    pub qualifiers: String,
    /// Storage key of the rank category (`even`, `one_over`, ...).
    pub rank: Option<String>,
    /// Golf label of the rank category (`Par`, `Bogey`, ...).
    pub rank_label: Option<String>,
}

impl From<&ScoreField> for HoleScoreView {
    fn from(field: &ScoreField) -> Self {
        Self {
            value: field.value(),
            qualifiers: field.qualifiers().to_string(),
            rank: field.rank().map(|rank| rank.as_str().to_string()),
            rank_label: field.rank().map(|rank| rank.label().to_string()),
        }
    }
}

/// Count of one rank category.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatView {
    pub category: String,
    pub label: String,
    pub count: u32,
}

impl From<(RankCategory, u32)> for StatView {
    fn from((category, count): (RankCategory, u32)) -> Self {
        Self {
            category: category.as_str().to_string(),
            label: category.label().to_string(),
            count,
        }
    }
}

/// Player row as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerView {
    pub player_number: u32,
    pub name: String,
    pub hole_scores: Vec<HoleScoreView>,
    pub total: ScoreView,
    pub stats: Vec<StatView>,
}

impl From<&PlayerAggregate> for PlayerView {
    fn from(player: &PlayerAggregate) -> Self {
        Self {
            player_number: player.number(),
            name: player.name().to_string(),
            hole_scores: player.hole_scores().iter().map(Into::into).collect(),
            total: player.total().into(),
            stats: player.stats().iter().map(Into::into).collect(),
        }
    }
}

/// Full projection of the active scorecard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScorecardView {
    pub scorecard_id: String,
    pub course_id: String,
    pub hole_numbers: Vec<String>,
    pub hole_pars: Vec<u32>,
    pub par_total: u32,
    pub players: Vec<PlayerView>,
    pub notes: String,
    pub save_status: SaveStatus,
}

impl ScorecardView {
    /// Project `scorecard`, tagging it with the current save status.
    pub fn new(scorecard: &ScorecardAggregate, save_status: SaveStatus) -> Self {
        Self {
            scorecard_id: scorecard.id().to_string(),
            course_id: scorecard.course().id().to_string(),
            hole_numbers: scorecard.course().hole_labels().to_vec(),
            hole_pars: scorecard.par_values(),
            par_total: scorecard.par_total().value(),
            players: scorecard.players().iter().map(Into::into).collect(),
            notes: scorecard.notes().to_string(),
            save_status,
        }
    }
}

/// Acknowledgement of a save trigger; the upload continues in the background.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveAccepted {
    pub scorecard_id: String,
    pub status: SaveStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::course::Course;

    #[test]
    fn create_request_requires_course_and_sane_names() {
        let ok = CreateScorecardRequest {
            course_id: "links".into(),
            player_names: vec!["Ana".into(), "Bo".into()],
        };
        assert!(ok.validate().is_ok());

        let blank = CreateScorecardRequest {
            course_id: " ".into(),
            player_names: vec!["".into()],
        };
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("course_id"));
        assert!(errors.field_errors().contains_key("player_names"));
    }

    #[test]
    fn hole_score_request_checks_qualifiers() {
        let request = SetHoleScoreRequest {
            value: 4,
            qualifiers: "x".repeat(20),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn value_requests_are_bounded() {
        let huge = SetHoleScoreRequest {
            value: i64::from(u32::MAX),
            qualifiers: String::new(),
        };
        assert!(huge.validate().unwrap_err().field_errors().contains_key("value"));
        let negative = SetHoleScoreRequest {
            value: -1,
            qualifiers: String::new(),
        };
        assert!(negative.validate().is_err());
        let max = SetHoleScoreRequest {
            value: 999,
            qualifiers: String::new(),
        };
        assert!(max.validate().is_ok());

        assert!(SetParRequest { value: 1000 }.validate().is_err());
        assert!(SetParRequest { value: -3 }.validate().is_err());
        assert!(SetParRequest { value: 5 }.validate().is_ok());
    }

    #[test]
    fn view_lists_every_stat_category() {
        let mut card =
            ScorecardAggregate::new(Course::numbered("links", vec![3, 4]).unwrap(), None).unwrap();
        card.set_hole_score(1, 0, 3, "o").unwrap();

        let view = ScorecardView::new(&card, SaveStatus::Idle);
        let player = &view.players[0];
        assert_eq!(player.stats.len(), RankCategory::ALL.len());
        assert_eq!(player.hole_scores[0].rank.as_deref(), Some("even"));
        assert_eq!(player.hole_scores[0].rank_label.as_deref(), Some("Par"));
        assert_eq!(player.total.value, 3);
        assert_eq!(view.par_total, 7);
    }
}
