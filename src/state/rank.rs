//! Classification of a single hole score relative to its par.

use serde::{Deserialize, Serialize};

/// Bucket a hole score falls into once compared against the hole par.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankCategory {
    /// Holed with the first stroke, regardless of par.
    HoleInOne,
    /// Two or more strokes under par (eagle, albatross, ...).
    TwoUnderOrBetter,
    /// One stroke under par.
    OneUnder,
    /// Exactly par.
    Even,
    /// One stroke over par.
    OneOver,
    /// Two strokes over par.
    TwoOver,
    /// Three or more strokes over par.
    ThreeOverOrWorse,
    /// Not classified yet (no score entered or no par known).
    None,
}

impl RankCategory {
    /// Every category in display order.
    pub const ALL: [RankCategory; 8] = [
        RankCategory::HoleInOne,
        RankCategory::TwoUnderOrBetter,
        RankCategory::OneUnder,
        RankCategory::Even,
        RankCategory::OneOver,
        RankCategory::TwoOver,
        RankCategory::ThreeOverOrWorse,
        RankCategory::None,
    ];

    /// Stable key used in persisted documents.
    pub fn as_str(self) -> &'static str {
        match self {
            RankCategory::HoleInOne => "hole_in_one",
            RankCategory::TwoUnderOrBetter => "two_under_or_better",
            RankCategory::OneUnder => "one_under",
            RankCategory::Even => "even",
            RankCategory::OneOver => "one_over",
            RankCategory::TwoOver => "two_over",
            RankCategory::ThreeOverOrWorse => "three_over_or_worse",
            RankCategory::None => "none",
        }
    }

    /// Short golf label shown next to a hole.
    pub fn label(self) -> &'static str {
        match self {
            RankCategory::HoleInOne => "Ace",
            RankCategory::TwoUnderOrBetter => "Eagle+",
            RankCategory::OneUnder => "Birdie",
            RankCategory::Even => "Par",
            RankCategory::OneOver => "Bogey",
            RankCategory::TwoOver => "Double",
            RankCategory::ThreeOverOrWorse => "Triple+",
            RankCategory::None => "-",
        }
    }
}

/// Classify `score` against `par`.
///
/// An ace always wins, even on a par-1 hole where it would otherwise be [`RankCategory::Even`].
pub fn classify(score: i64, par: i64) -> RankCategory {
    if par <= 0 || score <= 0 {
        return RankCategory::None;
    }

    if score == 1 {
        return RankCategory::HoleInOne;
    }

    if score == par {
        return RankCategory::Even;
    }

    match score - par {
        1 => RankCategory::OneOver,
        2 => RankCategory::TwoOver,
        diff if diff >= 3 => RankCategory::ThreeOverOrWorse,
        -1 => RankCategory::OneUnder,
        _ => RankCategory::TwoUnderOrBetter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_beats_everything() {
        for par in 1..=6 {
            assert_eq!(classify(1, par), RankCategory::HoleInOne);
        }
    }

    #[test]
    fn ace_on_par_one_is_not_even() {
        assert_eq!(classify(1, 1), RankCategory::HoleInOne);
    }

    #[test]
    fn score_equal_to_par_is_even() {
        for par in 2..=7 {
            assert_eq!(classify(par, par), RankCategory::Even);
        }
    }

    #[test]
    fn over_and_under_buckets() {
        assert_eq!(classify(5, 4), RankCategory::OneOver);
        assert_eq!(classify(6, 4), RankCategory::TwoOver);
        assert_eq!(classify(7, 4), RankCategory::ThreeOverOrWorse);
        assert_eq!(classify(12, 4), RankCategory::ThreeOverOrWorse);
        assert_eq!(classify(3, 4), RankCategory::OneUnder);
        assert_eq!(classify(2, 4), RankCategory::TwoUnderOrBetter);
        assert_eq!(classify(2, 5), RankCategory::TwoUnderOrBetter);
    }

    #[test]
    fn ace_on_par_five_is_not_albatross() {
        assert_eq!(classify(1, 5), RankCategory::HoleInOne);
    }

    #[test]
    fn missing_score_or_par_is_unclassified() {
        assert_eq!(classify(0, 4), RankCategory::None);
        assert_eq!(classify(4, 0), RankCategory::None);
        assert_eq!(classify(-1, 4), RankCategory::None);
        assert_eq!(classify(0, 0), RankCategory::None);
    }

    #[test]
    fn storage_keys_match_serde() {
        for category in RankCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
