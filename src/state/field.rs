//! Numeric score fields shared by hole scores, pars and totals.

use std::fmt;

use crate::state::rank::{RankCategory, classify};

/// Multiset of single-character annotations attached to a score, kept canonically sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Qualifiers(String);

impl Qualifiers {
    /// Build a canonical qualifier set from raw user input, dropping whitespace.
    pub fn new(raw: &str) -> Self {
        let mut chars = raw.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>();
        chars.sort_unstable();
        Self(chars.into_iter().collect())
    }

    /// Merge several qualifier sets into one sorted set, keeping duplicates.
    pub fn concat<'a>(sets: impl IntoIterator<Item = &'a Qualifiers>) -> Self {
        let mut chars = sets
            .into_iter()
            .flat_map(|set| set.0.chars())
            .collect::<Vec<_>>();
        chars.sort_unstable();
        Self(chars.into_iter().collect())
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no qualifier is attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of annotations, duplicates included.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One editable number on the scorecard: a hole score, a hole par, or a derived total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreField {
    value: u32,
    qualifiers: Qualifiers,
    /// Owning player number, `None` for course-level fields such as pars.
    player: Option<u32>,
    hole: usize,
    /// `None` for fields that are never rank-classified (pars and totals).
    rank: Option<RankCategory>,
}

impl ScoreField {
    /// Empty hole score owned by `player`; starts unclassified.
    pub fn hole_score(player: u32, hole: usize) -> Self {
        Self {
            value: 0,
            qualifiers: Qualifiers::default(),
            player: Some(player),
            hole,
            rank: Some(RankCategory::None),
        }
    }

    /// Par field for `hole`.
    pub fn par(hole: usize, value: u32) -> Self {
        Self {
            value,
            qualifiers: Qualifiers::default(),
            player: None,
            hole,
            rank: None,
        }
    }

    /// Derived total field; `player` is `None` for the par total.
    pub fn total(player: Option<u32>) -> Self {
        Self {
            value: 0,
            qualifiers: Qualifiers::default(),
            player,
            hole: 0,
            rank: None,
        }
    }

    /// Current numeric value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Attached qualifiers.
    pub fn qualifiers(&self) -> &Qualifiers {
        &self.qualifiers
    }

    /// Owning player number.
    pub fn player(&self) -> Option<u32> {
        self.player
    }

    /// Hole index this field belongs to.
    pub fn hole(&self) -> usize {
        self.hole
    }

    /// Cached rank, or `None` when classification is disabled for this field.
    pub fn rank(&self) -> Option<RankCategory> {
        self.rank
    }

    /// Whether this field participates in rank classification.
    pub fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }

    pub(crate) fn set(&mut self, value: u32, qualifiers: Qualifiers) {
        self.value = value;
        self.qualifiers = qualifiers;
    }

    pub(crate) fn set_value(&mut self, value: u32) {
        self.value = value;
    }

    /// Reclassify against `par`, returning `(previous, current)` when ranked.
    pub(crate) fn reclassify(&mut self, par: u32) -> Option<(RankCategory, RankCategory)> {
        let previous = self.rank?;
        let current = classify(i64::from(self.value), i64::from(par));
        self.rank = Some(current);
        Some((previous, current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifiers_are_sorted_and_trimmed() {
        let q = Qualifiers::new("w o b");
        assert_eq!(q.as_str(), "bow");
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn qualifier_duplicates_are_kept() {
        let q = Qualifiers::new("oxo");
        assert_eq!(q.as_str(), "oox");
    }

    #[test]
    fn concat_keeps_everything_sorted() {
        let a = Qualifiers::new("zo");
        let b = Qualifiers::new("ab");
        let empty = Qualifiers::default();
        assert_eq!(Qualifiers::concat([&a, &empty, &b]).as_str(), "aboz");
    }

    #[test]
    fn par_fields_are_never_ranked() {
        let mut par = ScoreField::par(0, 4);
        assert!(!par.is_ranked());
        assert_eq!(par.reclassify(4), None);
    }

    #[test]
    fn hole_score_reclassify_reports_transition() {
        let mut field = ScoreField::hole_score(1, 2);
        field.set(4, Qualifiers::default());
        assert_eq!(
            field.reclassify(4),
            Some((RankCategory::None, RankCategory::Even))
        );
        assert_eq!(field.rank(), Some(RankCategory::Even));
    }
}
