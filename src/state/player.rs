//! Per-player hole scores, running total and statistic counts.

use indexmap::IndexMap;

use crate::state::{
    field::{Qualifiers, ScoreField},
    rank::RankCategory,
    scorecard::ScorecardError,
};

/// Occurrence count of every [`RankCategory`] across a player's holes.
///
/// Every category is always present, so the counts sum to the number of holes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCounts(IndexMap<RankCategory, u32>);

impl StatCounts {
    /// Counts for `holes` holes that are all still unclassified.
    pub fn unclassified(holes: usize) -> Self {
        let mut counts = Self::empty();
        counts.0.insert(RankCategory::None, holes as u32);
        counts
    }

    fn empty() -> Self {
        Self(
            RankCategory::ALL
                .into_iter()
                .map(|category| (category, 0))
                .collect(),
        )
    }

    /// Rebuild counts from a list of ranks.
    pub fn from_ranks(ranks: impl IntoIterator<Item = RankCategory>) -> Self {
        let mut counts = Self::empty();
        for rank in ranks {
            counts.increment(rank);
        }
        counts
    }

    /// Count for `category`.
    pub fn get(&self, category: RankCategory) -> u32 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    /// Sum over every category.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    /// Iterate categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = (RankCategory, u32)> + '_ {
        self.0.iter().map(|(category, count)| (*category, *count))
    }

    fn increment(&mut self, category: RankCategory) {
        *self.0.entry(category).or_insert(0) += 1;
    }

    fn decrement(&mut self, category: RankCategory) {
        if let Some(count) = self.0.get_mut(&category) {
            *count = count.saturating_sub(1);
        }
    }

    fn shift(&mut self, from: RankCategory, to: RankCategory) {
        if from != to {
            self.decrement(from);
            self.increment(to);
        }
    }
}

/// One player's row on the scorecard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAggregate {
    number: u32,
    name: String,
    hole_scores: Vec<ScoreField>,
    total: ScoreField,
    stats: StatCounts,
}

impl PlayerAggregate {
    /// Create player `number` with one empty score per entry in `pars`.
    pub fn new(number: u32, name: Option<String>, pars: &[u32]) -> Self {
        let name = name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_name(number));
        let hole_scores = (0..pars.len())
            .map(|hole| ScoreField::hole_score(number, hole))
            .collect();

        Self {
            number,
            name,
            hole_scores,
            total: ScoreField::total(Some(number)),
            stats: StatCounts::unclassified(pars.len()),
        }
    }

    /// 1-based player number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-hole score fields, in hole order.
    pub fn hole_scores(&self) -> &[ScoreField] {
        &self.hole_scores
    }

    /// Derived total field.
    pub fn total(&self) -> &ScoreField {
        &self.total
    }

    /// Derived statistic counts.
    pub fn stats(&self) -> &StatCounts {
        &self.stats
    }

    /// Replace the display name.
    pub fn rename(&mut self, name: &str) -> Result<(), ScorecardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScorecardError::BlankName);
        }
        self.name = name.to_string();
        Ok(())
    }

    /// Record a score for `hole`, incrementally updating the statistics and the total.
    ///
    /// Values outside `0..=MAX_FIELD_VALUE` are rejected and leave the previous value untouched.
    pub fn set_hole_score(
        &mut self,
        hole: usize,
        value: i64,
        qualifiers: &str,
        par: u32,
    ) -> Result<RankCategory, ScorecardError> {
        let value = checked_value(value)?;
        let holes = self.hole_scores.len();
        let field = self
            .hole_scores
            .get_mut(hole)
            .ok_or(ScorecardError::HoleOutOfRange { hole, holes })?;

        field.set(value, Qualifiers::new(qualifiers));
        let current = match field.reclassify(par) {
            Some((previous, current)) => {
                self.stats.shift(previous, current);
                current
            }
            None => RankCategory::None,
        };

        self.update_total();
        Ok(current)
    }

    /// Reclassify every hole against a new par list and rebuild the statistics from scratch.
    pub fn update_stats(&mut self, pars: &[u32]) -> Result<(), ScorecardError> {
        if pars.len() != self.hole_scores.len() {
            return Err(ScorecardError::LengthMismatch {
                what: "hole pars",
                expected: self.hole_scores.len(),
                actual: pars.len(),
            });
        }

        for (field, par) in self.hole_scores.iter_mut().zip(pars) {
            field.reclassify(*par);
        }
        self.stats = StatCounts::from_ranks(
            self.hole_scores
                .iter()
                .map(|field| field.rank().unwrap_or(RankCategory::None)),
        );
        Ok(())
    }

    /// Re-sum hole values and re-concatenate their qualifiers.
    pub fn update_total(&mut self) {
        let value = self.hole_scores.iter().map(ScoreField::value).sum();
        let qualifiers = Qualifiers::concat(self.hole_scores.iter().map(ScoreField::qualifiers));
        self.total.set(value, qualifiers);
    }
}

fn default_name(number: u32) -> String {
    format!("Player {number}")
}

/// Largest stroke count or par a single field may hold.
pub const MAX_FIELD_VALUE: u32 = 999;

pub(crate) fn checked_value(value: i64) -> Result<u32, ScorecardError> {
    u32::try_from(value)
        .ok()
        .filter(|value| *value <= MAX_FIELD_VALUE)
        .ok_or(ScorecardError::InvalidValue { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(player: &PlayerAggregate) {
        let sum: u32 = player.hole_scores().iter().map(ScoreField::value).sum();
        assert_eq!(player.total().value(), sum);
        assert_eq!(player.stats().total() as usize, player.hole_scores().len());
    }

    #[test]
    fn new_player_has_one_unclassified_score_per_hole() {
        let player = PlayerAggregate::new(2, None, &[4, 4, 3]);
        assert_eq!(player.name(), "Player 2");
        assert_eq!(player.hole_scores().len(), 3);
        assert_eq!(player.stats().get(RankCategory::None), 3);
        assert_consistent(&player);
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let player = PlayerAggregate::new(1, Some("   ".into()), &[3]);
        assert_eq!(player.name(), "Player 1");
    }

    #[test]
    fn total_tracks_every_edit() {
        let pars = [3, 4, 5, 4];
        let mut player = PlayerAggregate::new(1, Some("Ana".into()), &pars);
        let edits = [(0, 3), (1, 5), (2, 4), (1, 4), (3, 9), (0, 0), (2, 1)];

        for (hole, value) in edits {
            player.set_hole_score(hole, value, "", pars[hole]).unwrap();
            assert_consistent(&player);
        }
        assert_eq!(player.total().value(), 4 + 1 + 9);
    }

    #[test]
    fn negative_value_is_rejected_and_previous_value_kept() {
        let mut player = PlayerAggregate::new(1, None, &[4]);
        player.set_hole_score(0, 5, "o", 4).unwrap();

        let err = player.set_hole_score(0, -2, "", 4).unwrap_err();
        assert!(matches!(err, ScorecardError::InvalidValue { value: -2 }));
        assert_eq!(player.hole_scores()[0].value(), 5);
        assert_eq!(player.hole_scores()[0].qualifiers().as_str(), "o");
        assert_eq!(player.stats().get(RankCategory::OneOver), 1);
    }

    #[test]
    fn oversized_value_is_rejected_and_totals_stay_consistent() {
        let mut player = PlayerAggregate::new(1, None, &[4, 4]);
        player.set_hole_score(0, 4, "", 4).unwrap();

        let err = player
            .set_hole_score(0, i64::from(u32::MAX), "", 4)
            .unwrap_err();
        assert!(matches!(err, ScorecardError::InvalidValue { .. }));
        assert!(player.set_hole_score(1, 1000, "", 4).is_err());
        player
            .set_hole_score(1, i64::from(MAX_FIELD_VALUE), "", 4)
            .unwrap();

        assert_eq!(player.hole_scores()[0].value(), 4);
        assert_eq!(player.total().value(), 4 + MAX_FIELD_VALUE);
        assert_consistent(&player);
    }

    #[test]
    fn unknown_hole_is_rejected() {
        let mut player = PlayerAggregate::new(1, None, &[4, 4]);
        let err = player.set_hole_score(2, 4, "", 4).unwrap_err();
        assert!(matches!(
            err,
            ScorecardError::HoleOutOfRange { hole: 2, holes: 2 }
        ));
    }

    #[test]
    fn incremental_stats_move_between_buckets() {
        let mut player = PlayerAggregate::new(1, None, &[4, 4]);
        player.set_hole_score(0, 4, "", 4).unwrap();
        assert_eq!(player.stats().get(RankCategory::Even), 1);

        player.set_hole_score(0, 3, "", 4).unwrap();
        assert_eq!(player.stats().get(RankCategory::Even), 0);
        assert_eq!(player.stats().get(RankCategory::OneUnder), 1);
        assert_eq!(player.stats().get(RankCategory::None), 1);
        assert_consistent(&player);
    }

    #[test]
    fn ace_on_par_five() {
        let mut player = PlayerAggregate::new(1, None, &[5]);
        let rank = player.set_hole_score(0, 1, "", 5).unwrap();
        assert_eq!(rank, RankCategory::HoleInOne);
        assert_eq!(player.stats().get(RankCategory::TwoUnderOrBetter), 0);
    }

    #[test]
    fn total_qualifiers_are_concatenated_and_sorted() {
        let pars = [4, 4, 4];
        let mut player = PlayerAggregate::new(1, None, &pars);
        player.set_hole_score(0, 5, "w", 4).unwrap();
        player.set_hole_score(2, 6, "ob", 4).unwrap();
        assert_eq!(player.total().qualifiers().as_str(), "bow");
    }

    #[test]
    fn update_stats_reclassifies_every_hole() {
        let mut player = PlayerAggregate::new(1, None, &[4, 4, 4]);
        for hole in 0..3 {
            player.set_hole_score(hole, 4, "", 4).unwrap();
        }
        assert_eq!(player.stats().get(RankCategory::Even), 3);

        player.update_stats(&[3, 5, 4]).unwrap();
        assert_eq!(player.stats().get(RankCategory::OneOver), 1);
        assert_eq!(player.stats().get(RankCategory::OneUnder), 1);
        assert_eq!(player.stats().get(RankCategory::Even), 1);
        assert_eq!(player.hole_scores()[0].rank(), Some(RankCategory::OneOver));
        assert_consistent(&player);
    }

    #[test]
    fn update_stats_rejects_wrong_length() {
        let mut player = PlayerAggregate::new(1, None, &[4, 4]);
        assert!(player.update_stats(&[4]).is_err());
    }
}
