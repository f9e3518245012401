//! Scoring Rules
//!
//! Pure functions mapping a dice multiset and a category label to a score,
//! parameterized by game variant. Total: unknown or derived labels score 0,
//! and no input panics. These functions only ever look at the current dice;
//! scorecard state is not consulted here.

use crate::game::variant::BaseVariant;

/// A scoring category, resolved from a cell label.
///
/// One enum arm per scoring rule; label lookup replaces the per-label closure
/// table so dispatch stays a plain match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Ones through Sixes: sum of dice showing the face.
    Upper(u8),
    /// Highest single pair.
    Pair,
    /// Two distinct pairs (Maxi: a quad may supply both).
    TwoPairs,
    /// Three pairs (Maxi boards only).
    ThreePairs,
    /// Three of a kind.
    ThreeOfKind,
    /// Four of a kind.
    FourOfKind,
    /// Five of a kind (Maxi boards only).
    FiveOfKind,
    /// Full house, 3 + 2 of distinct faces ("House" / "House 3-2").
    House,
    /// Two triples of distinct faces.
    House33,
    /// Quad plus pair of distinct faces.
    House24,
    /// Low straight.
    SmallStraight,
    /// Middle straight (Mini board only).
    MiddleStraight,
    /// High straight.
    LargeStraight,
    /// All six faces (Maxi boards only).
    FullStraight,
    /// Sum of all dice.
    Chance,
    /// All dice showing one face.
    Yatzy,
}

impl Category {
    /// Resolve a cell label to its scoring category.
    ///
    /// Derived labels (Sum, Bonus, Total) and unknown labels resolve to
    /// `None`; their values are computed by the scorecard, not here.
    pub fn from_label(label: &str) -> Option<Category> {
        match label {
            "Ones" => Some(Category::Upper(1)),
            "Twos" => Some(Category::Upper(2)),
            "Threes" => Some(Category::Upper(3)),
            "Fours" => Some(Category::Upper(4)),
            "Fives" => Some(Category::Upper(5)),
            "Sixes" => Some(Category::Upper(6)),
            "Pair" => Some(Category::Pair),
            "Two Pairs" => Some(Category::TwoPairs),
            "Three Pairs" => Some(Category::ThreePairs),
            "Three of Kind" => Some(Category::ThreeOfKind),
            "Four of Kind" => Some(Category::FourOfKind),
            "Five of Kind" => Some(Category::FiveOfKind),
            "House" | "House 3-2" => Some(Category::House),
            "House 3-3" => Some(Category::House33),
            "House 2-4" => Some(Category::House24),
            "Small Straight" => Some(Category::SmallStraight),
            "Middle Straight" => Some(Category::MiddleStraight),
            "Large Straight" => Some(Category::LargeStraight),
            "Full Straight" => Some(Category::FullStraight),
            "Chance" => Some(Category::Chance),
            "Yatzy" | "Maxi Yatzy" => Some(Category::Yatzy),
            _ => None,
        }
    }
}

/// Score a cell label against the current dice.
pub fn score(label: &str, dice: &[u8], variant: BaseVariant) -> i32 {
    match Category::from_label(label) {
        Some(category) => score_category(category, dice, variant),
        None => 0,
    }
}

/// Score a resolved category against the current dice.
pub fn score_category(category: Category, dice: &[u8], variant: BaseVariant) -> i32 {
    let counts = face_counts(dice);
    match category {
        Category::Upper(face) => i32::from(counts[usize::from(face - 1)]) * i32::from(face),
        Category::Pair => best_pairs(&counts, 1, false),
        Category::TwoPairs => best_pairs(&counts, 2, variant == BaseVariant::Maxi),
        Category::ThreePairs => best_pairs(&counts, 3, true),
        Category::ThreeOfKind => n_of_kind(&counts, 3),
        Category::FourOfKind => n_of_kind(&counts, 4),
        Category::FiveOfKind => n_of_kind(&counts, 5),
        Category::House => grouped_house(&counts, 3, 2),
        Category::House33 => grouped_house(&counts, 3, 3),
        Category::House24 => grouped_house(&counts, 4, 2),
        Category::SmallStraight => match variant {
            BaseVariant::Mini => straight(&counts, &[1, 2, 3, 4], 10),
            _ => straight(&counts, &[1, 2, 3, 4, 5], 15),
        },
        Category::MiddleStraight => match variant {
            BaseVariant::Mini => straight(&counts, &[2, 3, 4, 5], 14),
            _ => 0,
        },
        Category::LargeStraight => match variant {
            BaseVariant::Mini => straight(&counts, &[3, 4, 5, 6], 18),
            _ => straight(&counts, &[2, 3, 4, 5, 6], 20),
        },
        Category::FullStraight => straight(&counts, &[1, 2, 3, 4, 5, 6], 21),
        Category::Chance => dice
            .iter()
            .filter(|d| (1..=6).contains(*d))
            .map(|d| i32::from(*d))
            .sum(),
        Category::Yatzy => {
            let required = variant.config().dice_count as u8;
            if counts.iter().any(|c| *c >= required) {
                match variant {
                    BaseVariant::Maxi => 100,
                    _ => 50,
                }
            } else {
                0
            }
        }
    }
}

/// Count dice per face value; faces outside 1..=6 are ignored.
fn face_counts(dice: &[u8]) -> [u8; 6] {
    let mut counts = [0u8; 6];
    for die in dice {
        if (1..=6).contains(die) {
            counts[usize::from(die - 1)] += 1;
        }
    }
    counts
}

/// Take `needed` pairs greedily from the highest face down.
///
/// With `stack_faces` set (Maxi rule) a single face may supply up to
/// `count / 2` pairs, so a quad counts as two pairs and a six-of-a-kind as
/// three; otherwise each face supplies at most one. Every counted pair
/// contributes `face * 2`. Returns 0 unless `needed` pairs were found.
fn best_pairs(counts: &[u8; 6], needed: u8, stack_faces: bool) -> i32 {
    let mut taken = 0u8;
    let mut total = 0i32;
    for face in (1..=6u8).rev() {
        let count = counts[usize::from(face - 1)];
        let mut available = if stack_faces { count / 2 } else { u8::from(count >= 2) };
        while available > 0 && taken < needed {
            total += i32::from(face) * 2;
            taken += 1;
            available -= 1;
        }
    }
    if taken == needed {
        total
    } else {
        0
    }
}

/// Highest face with at least `n` dice, scored `face * n`.
fn n_of_kind(counts: &[u8; 6], n: u8) -> i32 {
    for face in (1..=6u8).rev() {
        if counts[usize::from(face - 1)] >= n {
            return i32::from(face) * i32::from(n);
        }
    }
    0
}

/// Two count groups of distinct faces, sized `first` and `second`.
///
/// The larger group is taken from the highest qualifying face, the second
/// from the highest remaining face. Returns 0 if either group is absent.
fn grouped_house(counts: &[u8; 6], first: u8, second: u8) -> i32 {
    let first_face = (1..=6u8)
        .rev()
        .find(|face| counts[usize::from(face - 1)] >= first);
    let Some(a) = first_face else { return 0 };
    let second_face = (1..=6u8)
        .rev()
        .find(|face| *face != a && counts[usize::from(face - 1)] >= second);
    let Some(b) = second_face else { return 0 };
    i32::from(a) * i32::from(first) + i32::from(b) * i32::from(second)
}

/// Exact membership test: every target face present at least once.
fn straight(counts: &[u8; 6], targets: &[u8], points: i32) -> i32 {
    if targets.iter().all(|face| counts[usize::from(face - 1)] > 0) {
        points
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_LABELS: &[&str] = &[
        "Ones", "Twos", "Threes", "Fours", "Fives", "Sixes", "Pair", "Two Pairs",
        "Three Pairs", "Three of Kind", "Four of Kind", "Five of Kind", "House",
        "House 3-2", "House 3-3", "House 2-4", "Small Straight", "Middle Straight",
        "Large Straight", "Full Straight", "Chance", "Yatzy", "Maxi Yatzy",
    ];

    #[test]
    fn test_upper_section() {
        assert_eq!(score("Ones", &[1, 1, 3, 4, 1], BaseVariant::Ordinary), 3);
        assert_eq!(score("Sixes", &[6, 6, 2, 3, 4], BaseVariant::Ordinary), 12);
        assert_eq!(score("Fours", &[1, 2, 3, 5, 6], BaseVariant::Ordinary), 0);
    }

    #[test]
    fn test_pair_prefers_highest_face() {
        assert_eq!(score("Pair", &[2, 2, 5, 5, 3], BaseVariant::Ordinary), 10);
        assert_eq!(score("Pair", &[3, 3, 3, 1, 2], BaseVariant::Ordinary), 6);
        assert_eq!(score("Pair", &[1, 2, 3, 4, 5], BaseVariant::Ordinary), 0);
    }

    #[test]
    fn test_two_pairs_distinct_faces() {
        assert_eq!(score("Two Pairs", &[2, 2, 5, 5, 3], BaseVariant::Ordinary), 14);
        // Four of a kind is a single pair outside Maxi.
        assert_eq!(score("Two Pairs", &[6, 6, 6, 6, 2], BaseVariant::Ordinary), 0);
        assert_eq!(score("Two Pairs", &[6, 6, 6, 2, 2], BaseVariant::Ordinary), 16);
    }

    #[test]
    fn test_two_pairs_maxi_quad_counts_twice() {
        assert_eq!(score("Two Pairs", &[6, 6, 6, 6, 2, 3], BaseVariant::Maxi), 24);
    }

    #[test]
    fn test_three_pairs() {
        assert_eq!(score("Three Pairs", &[5, 5, 3, 3, 1, 1], BaseVariant::Maxi), 18);
        assert_eq!(score("Three Pairs", &[5, 5, 5, 5, 3, 3], BaseVariant::Maxi), 26);
        assert_eq!(score("Three Pairs", &[6, 6, 6, 6, 6, 6], BaseVariant::Maxi), 36);
        assert_eq!(score("Three Pairs", &[5, 5, 3, 3, 1, 2], BaseVariant::Maxi), 0);
    }

    #[test]
    fn test_n_of_kind() {
        assert_eq!(score("Three of Kind", &[4, 4, 4, 2, 1], BaseVariant::Ordinary), 12);
        assert_eq!(score("Four of Kind", &[4, 4, 4, 4, 1], BaseVariant::Ordinary), 16);
        assert_eq!(score("Four of Kind", &[4, 4, 4, 2, 1], BaseVariant::Ordinary), 0);
        assert_eq!(score("Five of Kind", &[3, 3, 3, 3, 3, 6], BaseVariant::Maxi), 15);
        // Higher count still qualifies.
        assert_eq!(score("Three of Kind", &[5, 5, 5, 5, 1], BaseVariant::Ordinary), 15);
    }

    #[test]
    fn test_house() {
        // Scenario: [2,2,3,3,3] House = 3*3 + 2*2 = 13.
        assert_eq!(score("House", &[2, 2, 3, 3, 3], BaseVariant::Ordinary), 13);
        assert_eq!(score("House", &[2, 2, 3, 3, 1], BaseVariant::Ordinary), 0);
        // Yatzy is not a house: no second distinct face.
        assert_eq!(score("House", &[5, 5, 5, 5, 5], BaseVariant::Ordinary), 0);
        assert_eq!(score("House 3-2", &[6, 6, 6, 5, 5, 1], BaseVariant::Maxi), 28);
    }

    #[test]
    fn test_maxi_houses() {
        assert_eq!(score("House 3-3", &[6, 6, 6, 5, 5, 5], BaseVariant::Maxi), 33);
        assert_eq!(score("House 3-3", &[6, 6, 6, 5, 5, 4], BaseVariant::Maxi), 0);
        assert_eq!(score("House 2-4", &[6, 6, 6, 6, 5, 5], BaseVariant::Maxi), 34);
        assert_eq!(score("House 2-4", &[5, 5, 5, 5, 6, 6], BaseVariant::Maxi), 32);
        assert_eq!(score("House 2-4", &[5, 5, 5, 5, 5, 6], BaseVariant::Maxi), 0);
    }

    #[test]
    fn test_straights() {
        assert_eq!(score("Small Straight", &[1, 2, 3, 4, 5], BaseVariant::Ordinary), 15);
        assert_eq!(score("Large Straight", &[2, 3, 4, 5, 6], BaseVariant::Ordinary), 20);
        assert_eq!(score("Small Straight", &[1, 2, 3, 4, 4], BaseVariant::Ordinary), 0);
        // Scenario: Maxi [1,2,3,4,5,6] Full Straight = 21.
        assert_eq!(score("Full Straight", &[1, 2, 3, 4, 5, 6], BaseVariant::Maxi), 21);
        // Sixth die is free for Maxi small straight.
        assert_eq!(score("Small Straight", &[1, 2, 3, 4, 5, 5], BaseVariant::Maxi), 15);
    }

    #[test]
    fn test_mini_straights() {
        assert_eq!(score("Small Straight", &[1, 2, 3, 4], BaseVariant::Mini), 10);
        assert_eq!(score("Middle Straight", &[2, 3, 4, 5], BaseVariant::Mini), 14);
        assert_eq!(score("Large Straight", &[3, 4, 5, 6], BaseVariant::Mini), 18);
        assert_eq!(score("Middle Straight", &[1, 2, 3, 4], BaseVariant::Mini), 0);
    }

    #[test]
    fn test_chance() {
        assert_eq!(score("Chance", &[1, 2, 3, 4, 5], BaseVariant::Ordinary), 15);
        assert_eq!(score("Chance", &[6, 6, 6, 6, 6], BaseVariant::Ordinary), 30);
    }

    #[test]
    fn test_yatzy() {
        // Scenario: Ordinary [1,1,1,1,1] Yatzy = 50.
        assert_eq!(score("Yatzy", &[1, 1, 1, 1, 1], BaseVariant::Ordinary), 50);
        assert_eq!(score("Yatzy", &[1, 1, 1, 1, 2], BaseVariant::Ordinary), 0);
        assert_eq!(score("Maxi Yatzy", &[4, 4, 4, 4, 4, 4], BaseVariant::Maxi), 100);
        assert_eq!(score("Maxi Yatzy", &[4, 4, 4, 4, 4, 5], BaseVariant::Maxi), 0);
        assert_eq!(score("Yatzy", &[2, 2, 2, 2], BaseVariant::Mini), 50);
    }

    #[test]
    fn test_derived_and_unknown_labels_score_zero() {
        for label in ["Sum", "Bonus", "Total", "Nonsense"] {
            assert_eq!(score(label, &[6, 6, 6, 6, 6], BaseVariant::Ordinary), 0);
        }
    }

    #[test]
    fn test_out_of_range_faces_ignored() {
        assert_eq!(score("Chance", &[0, 7, 255, 3, 4], BaseVariant::Ordinary), 7);
        assert_eq!(score("Pair", &[0, 0, 0, 0, 0], BaseVariant::Ordinary), 0);
    }

    proptest! {
        #[test]
        fn prop_score_total_and_deterministic(
            dice in proptest::collection::vec(0u8..=8, 0..8),
            label_idx in 0usize..ALL_LABELS.len(),
        ) {
            for variant in [BaseVariant::Ordinary, BaseVariant::Mini, BaseVariant::Maxi] {
                let label = ALL_LABELS[label_idx];
                let first = score(label, &dice, variant);
                let second = score(label, &dice, variant);
                prop_assert!(first >= 0);
                prop_assert_eq!(first, second);
            }
        }
    }
}
