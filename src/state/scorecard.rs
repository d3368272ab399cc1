//! The scorecard aggregate: course pars, par total and every player row.
//!
//! Every public mutation leaves the aggregate consistent: each player has one score per
//! hole, totals equal the sum of hole values, statistic counts sum to the hole count and
//! the par total equals the sum of pars.

use thiserror::Error;
use tracing::warn;

use crate::{
    dao::models::{CourseDocument, PlayerDocument, ScoreDocument, ScorecardDocument},
    state::{
        course::Course,
        field::{Qualifiers, ScoreField},
        ids::{ScorecardId, UserspaceId},
        player::{MAX_FIELD_VALUE, PlayerAggregate, checked_value},
        rank::RankCategory,
    },
};

/// Validation failures raised by scorecard mutations. These are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScorecardError {
    /// Score or par below zero or above [`MAX_FIELD_VALUE`].
    #[error("value must be between 0 and {max} (got {value})", max = MAX_FIELD_VALUE)]
    InvalidValue {
        /// Rejected value.
        value: i64,
    },
    /// Hole index past the end of the course.
    #[error("hole {hole} does not exist (course has {holes} holes)")]
    HoleOutOfRange {
        /// Requested hole index.
        hole: usize,
        /// Number of holes on the course.
        holes: usize,
    },
    /// No player with that number.
    #[error("player {0} does not exist")]
    UnknownPlayer(u32),
    /// Two lists that must line up hole by hole do not.
    #[error("{what} length mismatch (expected {expected}, got {actual})")]
    LengthMismatch {
        /// Which list was wrong.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// Identifier does not follow the scorecard id format.
    #[error("invalid scorecard id `{0}`")]
    InvalidId(String),
    /// Course without holes.
    #[error("course `{0}` has no holes")]
    EmptyCourse(String),
    /// Course is disabled in its catalog.
    #[error("course `{0}` is disabled")]
    DisabledCourse(String),
    /// A scorecard must keep at least one player.
    #[error("scorecard has no players")]
    NoPlayers,
    /// Player names cannot be blank.
    #[error("player name must not be empty")]
    BlankName,
    /// Stored player rows must be numbered `1..=n` in order.
    #[error("player at position {position} is numbered {actual} (expected {position})")]
    PlayerNumbering {
        /// Expected 1-based number at this position.
        position: u32,
        /// Number found in the document.
        actual: u32,
    },
    /// Userspace passphrases cannot be blank.
    #[error("passphrase must not be empty")]
    BlankPassphrase,
}

/// Target of [`ScorecardAggregate::update_score_total`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSelector {
    /// Every player on the card.
    All,
    /// A single player by 1-based number.
    Number(u32),
}

/// Scores of one round on one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorecardAggregate {
    id: ScorecardId,
    course: Course,
    hole_pars: Vec<ScoreField>,
    par_total: ScoreField,
    players: Vec<PlayerAggregate>,
    notes: String,
}

impl ScorecardAggregate {
    /// Start a scorecard on `course` with a single player.
    pub fn new(course: Course, userspace: Option<&UserspaceId>) -> Result<Self, ScorecardError> {
        if !course.is_enabled() {
            return Err(ScorecardError::DisabledCourse(course.id().to_string()));
        }

        let hole_pars = course
            .pars()
            .iter()
            .enumerate()
            .map(|(hole, par)| ScoreField::par(hole, *par))
            .collect();
        let first_player = PlayerAggregate::new(1, None, course.pars());

        let mut scorecard = Self {
            id: ScorecardId::generate(userspace),
            course,
            hole_pars,
            par_total: ScoreField::total(None),
            players: vec![first_player],
            notes: String::new(),
        };
        scorecard.update_par_total();
        Ok(scorecard)
    }

    /// Immutable identity.
    pub fn id(&self) -> &ScorecardId {
        &self.id
    }

    /// Course the round is played on.
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Editable par fields.
    pub fn hole_pars(&self) -> &[ScoreField] {
        &self.hole_pars
    }

    /// Par values in hole order.
    pub fn par_values(&self) -> Vec<u32> {
        self.hole_pars.iter().map(ScoreField::value).collect()
    }

    /// Derived par total.
    pub fn par_total(&self) -> &ScoreField {
        &self.par_total
    }

    /// Player rows in number order.
    pub fn players(&self) -> &[PlayerAggregate] {
        &self.players
    }

    /// Look up a player by number.
    pub fn player(&self, number: u32) -> Option<&PlayerAggregate> {
        self.players.iter().find(|player| player.number() == number)
    }

    /// Free-text notes.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Number of holes on the card.
    pub fn hole_count(&self) -> usize {
        self.hole_pars.len()
    }

    /// Append a player with the next sequential number and return that number.
    pub fn add_player(&mut self, name: Option<String>) -> u32 {
        let number = self
            .players
            .iter()
            .map(PlayerAggregate::number)
            .max()
            .unwrap_or(0)
            + 1;
        let pars = self.par_values();
        self.players.push(PlayerAggregate::new(number, name, &pars));
        number
    }

    /// Remove the last player unless it is the only one left. Returns whether a player was removed.
    pub fn remove_player(&mut self) -> bool {
        if self.players.len() <= 1 {
            return false;
        }
        self.players.pop().is_some()
    }

    /// Rename player `number`.
    pub fn rename_player(&mut self, number: u32, name: &str) -> Result<(), ScorecardError> {
        self.player_mut(number)?.rename(name)
    }

    /// Replace the notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Record a score for `hole` on player `number`.
    pub fn set_hole_score(
        &mut self,
        number: u32,
        hole: usize,
        value: i64,
        qualifiers: &str,
    ) -> Result<RankCategory, ScorecardError> {
        let holes = self.hole_pars.len();
        let par = self
            .hole_pars
            .get(hole)
            .map(ScoreField::value)
            .ok_or(ScorecardError::HoleOutOfRange { hole, holes })?;
        self.player_mut(number)?
            .set_hole_score(hole, value, qualifiers, par)
    }

    /// Override the par of `hole` for this scorecard and reclassify every player.
    pub fn set_hole_par(&mut self, hole: usize, value: i64) -> Result<(), ScorecardError> {
        let value = checked_value(value)?;
        let holes = self.hole_pars.len();
        let field = self
            .hole_pars
            .get_mut(hole)
            .ok_or(ScorecardError::HoleOutOfRange { hole, holes })?;
        field.set_value(value);

        self.update_par_total();
        let pars = self.par_values();
        for player in &mut self.players {
            player.update_stats(&pars)?;
        }
        Ok(())
    }

    /// Re-sum the editable pars.
    pub fn update_par_total(&mut self) {
        let total = self.hole_pars.iter().map(ScoreField::value).sum();
        self.par_total.set_value(total);
    }

    /// Re-derive the score total of one or all players.
    pub fn update_score_total(&mut self, selector: PlayerSelector) -> Result<(), ScorecardError> {
        match selector {
            PlayerSelector::All => {
                self.players
                    .iter_mut()
                    .for_each(PlayerAggregate::update_total);
                Ok(())
            }
            PlayerSelector::Number(number) => {
                self.player_mut(number)?.update_total();
                Ok(())
            }
        }
    }

    fn player_mut(&mut self, number: u32) -> Result<&mut PlayerAggregate, ScorecardError> {
        self.players
            .iter_mut()
            .find(|player| player.number() == number)
            .ok_or(ScorecardError::UnknownPlayer(number))
    }
}

impl From<&ScoreField> for ScoreDocument {
    fn from(value: &ScoreField) -> Self {
        Self {
            value: value.value(),
            qualifiers: value.qualifiers().to_string(),
        }
    }
}

impl From<&PlayerAggregate> for PlayerDocument {
    fn from(value: &PlayerAggregate) -> Self {
        Self {
            player_number: value.number(),
            name: value.name().to_string(),
            hole_scores: value.hole_scores().iter().map(Into::into).collect(),
            total_score: value.total().into(),
            stats: value.stats().iter().collect(),
        }
    }
}

impl From<&ScorecardAggregate> for ScorecardDocument {
    fn from(value: &ScorecardAggregate) -> Self {
        Self {
            scorecard_id: value.id.to_string(),
            course: CourseDocument::from(&value.course),
            hole_numbers: value.course.hole_labels().to_vec(),
            hole_pars: value.par_values(),
            holes_par_total: value.par_total.value(),
            players: value.players.iter().map(Into::into).collect(),
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<ScorecardDocument> for ScorecardAggregate {
    type Error = ScorecardError;

    /// Rebuild an aggregate from storage. Derived values are recomputed from hole values.
    fn try_from(value: ScorecardDocument) -> Result<Self, Self::Error> {
        let id = ScorecardId::parse(&value.scorecard_id)?;
        let course = Course::try_from(value.course)?;

        let holes = course.hole_count();
        if value.hole_numbers.len() != holes {
            return Err(ScorecardError::LengthMismatch {
                what: "hole numbers",
                expected: holes,
                actual: value.hole_numbers.len(),
            });
        }
        if value.hole_pars.len() != holes {
            return Err(ScorecardError::LengthMismatch {
                what: "hole pars",
                expected: holes,
                actual: value.hole_pars.len(),
            });
        }
        if value.players.is_empty() {
            return Err(ScorecardError::NoPlayers);
        }
        for par in &value.hole_pars {
            checked_value(i64::from(*par))?;
        }
        for (index, doc) in value.players.iter().enumerate() {
            let position = index as u32 + 1;
            if doc.player_number != position {
                return Err(ScorecardError::PlayerNumbering {
                    position,
                    actual: doc.player_number,
                });
            }
        }

        let mut scorecard = Self {
            id,
            hole_pars: value
                .hole_pars
                .iter()
                .enumerate()
                .map(|(hole, par)| ScoreField::par(hole, *par))
                .collect(),
            course,
            par_total: ScoreField::total(None),
            players: Vec::with_capacity(value.players.len()),
            notes: value.notes,
        };
        scorecard.update_par_total();
        if scorecard.par_total.value() != value.holes_par_total {
            warn!(
                scorecard_id = %scorecard.id,
                stored = value.holes_par_total,
                computed = scorecard.par_total.value(),
                "stored par total disagrees with pars; using computed value"
            );
        }

        let pars = scorecard.par_values();
        for doc in value.players {
            scorecard.players.push(player_from_document(doc, &pars)?);
        }

        Ok(scorecard)
    }
}

fn player_from_document(
    doc: PlayerDocument,
    pars: &[u32],
) -> Result<PlayerAggregate, ScorecardError> {
    if doc.hole_scores.len() != pars.len() {
        return Err(ScorecardError::LengthMismatch {
            what: "player hole scores",
            expected: pars.len(),
            actual: doc.hole_scores.len(),
        });
    }

    let mut player = PlayerAggregate::new(doc.player_number, Some(doc.name), pars);
    for (hole, score) in doc.hole_scores.iter().enumerate() {
        player.set_hole_score(hole, i64::from(score.value), &score.qualifiers, pars[hole])?;
    }

    let stored_qualifiers = Qualifiers::new(&doc.total_score.qualifiers);
    if doc.total_score.value != player.total().value()
        || &stored_qualifiers != player.total().qualifiers()
    {
        warn!(
            player = doc.player_number,
            stored = doc.total_score.value,
            computed = player.total().value(),
            "stored player total disagrees with hole scores; using computed value"
        );
    }

    Ok(player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::rank::RankCategory::{
        Even, HoleInOne, OneOver, OneUnder, ThreeOverOrWorse, TwoOver, TwoUnderOrBetter,
    };

    fn scorecard(pars: Vec<u32>) -> ScorecardAggregate {
        ScorecardAggregate::new(Course::numbered("links", pars).unwrap(), None).unwrap()
    }

    fn assert_invariants(card: &ScorecardAggregate) {
        let par_sum: u32 = card.par_values().iter().sum();
        assert_eq!(card.par_total().value(), par_sum);
        assert!(!card.players().is_empty());
        for player in card.players() {
            assert_eq!(player.hole_scores().len(), card.hole_count());
            let sum: u32 = player.hole_scores().iter().map(ScoreField::value).sum();
            assert_eq!(player.total().value(), sum);
            assert_eq!(player.stats().total() as usize, card.hole_count());
        }
    }

    #[test]
    fn new_scorecard_has_one_player_and_par_total() {
        let card = scorecard(vec![3, 3, 4]);
        assert_eq!(card.players().len(), 1);
        assert_eq!(card.players()[0].number(), 1);
        assert_eq!(card.par_total().value(), 10);
        assert_invariants(&card);
    }

    #[test]
    fn disabled_course_cannot_start_a_card() {
        let course = Course::new("old", vec!["1".into()], vec![3], false).unwrap();
        assert!(matches!(
            ScorecardAggregate::new(course, None),
            Err(ScorecardError::DisabledCourse(_))
        ));
    }

    #[test]
    fn three_hole_round_totals_and_ranks() {
        let mut card = scorecard(vec![3, 3, 4]);
        for (hole, value) in [3, 4, 5].into_iter().enumerate() {
            card.set_hole_score(1, hole, value, "").unwrap();
        }

        let player = &card.players()[0];
        assert_eq!(card.par_total().value(), 10);
        assert_eq!(player.total().value(), 12);
        let ranks = player
            .hole_scores()
            .iter()
            .map(|field| field.rank().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(ranks, vec![Even, OneOver, OneOver]);
        assert_eq!(player.stats().get(Even), 1);
        assert_eq!(player.stats().get(OneOver), 2);
        for other in [
            HoleInOne,
            TwoUnderOrBetter,
            OneUnder,
            TwoOver,
            ThreeOverOrWorse,
            RankCategory::None,
        ] {
            assert_eq!(player.stats().get(other), 0);
        }
        assert_invariants(&card);
    }

    #[test]
    fn last_player_cannot_be_removed() {
        let mut card = scorecard(vec![4]);
        assert!(!card.remove_player());
        assert_eq!(card.players().len(), 1);
    }

    #[test]
    fn players_are_numbered_sequentially_and_removed_from_the_end() {
        let mut card = scorecard(vec![4, 4]);
        assert_eq!(card.add_player(Some("Bo".into())), 2);
        assert_eq!(card.add_player(None), 3);
        assert_eq!(card.player(3).unwrap().name(), "Player 3");
        assert_invariants(&card);

        assert!(card.remove_player());
        assert_eq!(card.players().len(), 2);
        assert_eq!(card.add_player(None), 3);
    }

    #[test]
    fn ace_on_par_five_is_hole_in_one() {
        let mut card = scorecard(vec![5]);
        let rank = card.set_hole_score(1, 0, 1, "").unwrap();
        assert_eq!(rank, HoleInOne);
    }

    #[test]
    fn unknown_player_and_hole_are_rejected() {
        let mut card = scorecard(vec![4, 4]);
        assert_eq!(
            card.set_hole_score(7, 0, 4, ""),
            Err(ScorecardError::UnknownPlayer(7))
        );
        assert_eq!(
            card.set_hole_score(1, 5, 4, ""),
            Err(ScorecardError::HoleOutOfRange { hole: 5, holes: 2 })
        );
        assert_invariants(&card);
    }

    #[test]
    fn par_override_updates_total_and_every_player() {
        let mut card = scorecard(vec![4, 4]);
        card.add_player(None);
        card.set_hole_score(1, 0, 4, "").unwrap();
        card.set_hole_score(2, 0, 5, "").unwrap();

        card.set_hole_par(0, 5).unwrap();
        assert_eq!(card.par_total().value(), 9);
        assert_eq!(card.course().pars(), [4, 4]);
        assert_eq!(card.player(1).unwrap().stats().get(OneUnder), 1);
        assert_eq!(card.player(2).unwrap().stats().get(Even), 1);
        assert_invariants(&card);

        assert!(card.set_hole_par(0, -1).is_err());
        assert_eq!(card.par_total().value(), 9);
    }

    #[test]
    fn update_score_total_for_one_or_all() {
        let mut card = scorecard(vec![4]);
        card.add_player(None);
        card.update_score_total(PlayerSelector::All).unwrap();
        card.update_score_total(PlayerSelector::Number(2)).unwrap();
        assert_eq!(
            card.update_score_total(PlayerSelector::Number(9)),
            Err(ScorecardError::UnknownPlayer(9))
        );
    }

    #[test]
    fn document_round_trip_keeps_derived_values() {
        let mut card = scorecard(vec![4, 3, 5, 4]);
        card.add_player(Some("Kim".into()));
        card.set_hole_score(1, 0, 4, "o").unwrap();
        card.set_hole_score(1, 1, 1, "").unwrap();
        card.set_hole_score(1, 2, 7, "wb").unwrap();
        card.set_hole_score(2, 3, 3, "").unwrap();
        card.set_hole_par(2, 4).unwrap();
        card.set_notes("windy back nine");

        let doc = ScorecardDocument::from(&card);
        let json = serde_json::to_string(&doc).unwrap();
        let decoded: ScorecardDocument = serde_json::from_str(&json).unwrap();
        let restored = ScorecardAggregate::try_from(decoded).unwrap();

        assert_eq!(restored, card);
        assert_invariants(&restored);
    }

    #[test]
    fn document_has_the_expected_top_level_fields() {
        let card = scorecard(vec![4]);
        let value = serde_json::to_value(ScorecardDocument::from(&card)).unwrap();
        for key in [
            "scorecard_id",
            "course",
            "hole_numbers",
            "hole_pars",
            "holes_par_total",
            "players",
            "notes",
        ] {
            assert!(value.get(key).is_some(), "missing `{key}`");
        }
        assert_eq!(value["players"][0]["stats"]["none"], 1);
    }

    #[test]
    fn loading_recomputes_tampered_totals() {
        let mut card = scorecard(vec![4, 4]);
        card.set_hole_score(1, 0, 5, "").unwrap();
        let mut doc = ScorecardDocument::from(&card);
        doc.holes_par_total = 99;
        doc.players[0].total_score.value = 1;
        doc.players[0].stats.clear();

        let restored = ScorecardAggregate::try_from(doc).unwrap();
        assert_eq!(restored.par_total().value(), 8);
        assert_eq!(restored.players()[0].total().value(), 5);
        assert_invariants(&restored);
    }

    fn with_two_players(card: &ScorecardAggregate) -> ScorecardAggregate {
        let mut card = card.clone();
        card.add_player(None);
        card
    }

    #[test]
    fn oversized_par_is_rejected_without_touching_totals() {
        let mut card = scorecard(vec![4, 4]);
        card.set_hole_score(1, 0, 4, "").unwrap();

        assert!(matches!(
            card.set_hole_par(0, i64::from(u32::MAX)),
            Err(ScorecardError::InvalidValue { .. })
        ));
        assert!(card.set_hole_score(1, 1, i64::from(u32::MAX), "").is_err());

        assert_eq!(card.par_total().value(), 8);
        assert_eq!(card.players()[0].total().value(), 4);
        assert_invariants(&card);
    }

    #[test]
    fn loading_rejects_misaligned_documents() {
        let card = scorecard(vec![4, 4]);

        let mut short_player = ScorecardDocument::from(&card);
        short_player.players[0].hole_scores.pop();
        assert!(matches!(
            ScorecardAggregate::try_from(short_player),
            Err(ScorecardError::LengthMismatch { .. })
        ));

        let mut no_players = ScorecardDocument::from(&card);
        no_players.players.clear();
        assert_eq!(
            ScorecardAggregate::try_from(no_players),
            Err(ScorecardError::NoPlayers)
        );

        let mut duplicate = ScorecardDocument::from(&with_two_players(&card));
        duplicate.players[1].player_number = 1;
        assert_eq!(
            ScorecardAggregate::try_from(duplicate),
            Err(ScorecardError::PlayerNumbering {
                position: 2,
                actual: 1
            })
        );

        let mut zero = ScorecardDocument::from(&card);
        zero.players[0].player_number = 0;
        assert!(matches!(
            ScorecardAggregate::try_from(zero),
            Err(ScorecardError::PlayerNumbering { .. })
        ));

        let mut huge_par = ScorecardDocument::from(&card);
        huge_par.hole_pars[0] = u32::MAX;
        assert!(matches!(
            ScorecardAggregate::try_from(huge_par),
            Err(ScorecardError::InvalidValue { .. })
        ));

        let mut bad_id = ScorecardDocument::from(&card);
        bad_id.scorecard_id = "not an id".into();
        assert!(matches!(
            ScorecardAggregate::try_from(bad_id),
            Err(ScorecardError::InvalidId(_))
        ));
    }
}
