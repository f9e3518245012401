//! Game Variant Configuration
//!
//! Static per-variant tables consulted by scoring, scorecards and sessions.
//! Label order defines cell index on the scorecard and on the wire.

use serde::{Deserialize, Serialize};

/// A playable ruleset key.
///
/// The Maxi sub-variants share the Maxi board and scoring rules; they only
/// differ as matchmaking keys (clients with different reroll/extra-move house
/// rules must not be seated together).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Classic 5-dice Yatzy.
    Ordinary,
    /// 4-dice short game.
    Mini,
    /// 6-dice Maxi Yatzy.
    Maxi,
    /// Maxi with reroll house rule.
    MaxiR3,
    /// Maxi with extra-move house rule.
    MaxiE3,
    /// Maxi with both house rules.
    MaxiRE3,
}

/// Base rulesets that own the static configuration tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseVariant {
    /// 5 dice, 18 cells.
    Ordinary,
    /// 4 dice, 17 cells.
    Mini,
    /// 6 dice, 23 cells.
    Maxi,
}

impl Variant {
    /// Collapse sub-variants to the base ruleset holding their board config.
    pub fn base(self) -> BaseVariant {
        match self {
            Variant::Ordinary => BaseVariant::Ordinary,
            Variant::Mini => BaseVariant::Mini,
            Variant::Maxi | Variant::MaxiR3 | Variant::MaxiE3 | Variant::MaxiRE3 => {
                BaseVariant::Maxi
            }
        }
    }

    /// Configuration table for this variant.
    pub fn config(self) -> &'static VariantConfig {
        self.base().config()
    }

    /// Wire key for this variant.
    pub fn key(self) -> &'static str {
        match self {
            Variant::Ordinary => "Ordinary",
            Variant::Mini => "Mini",
            Variant::Maxi => "Maxi",
            Variant::MaxiR3 => "MaxiR3",
            Variant::MaxiE3 => "MaxiE3",
            Variant::MaxiRE3 => "MaxiRE3",
        }
    }

    /// Parse a wire key.
    pub fn from_key(key: &str) -> Option<Variant> {
        match key {
            "Ordinary" => Some(Variant::Ordinary),
            "Mini" => Some(Variant::Mini),
            "Maxi" => Some(Variant::Maxi),
            "MaxiR3" => Some(Variant::MaxiR3),
            "MaxiE3" => Some(Variant::MaxiE3),
            "MaxiRE3" => Some(Variant::MaxiRE3),
            _ => None,
        }
    }
}

impl BaseVariant {
    /// Configuration table for this base ruleset.
    pub fn config(self) -> &'static VariantConfig {
        match self {
            BaseVariant::Ordinary => &ORDINARY,
            BaseVariant::Mini => &MINI,
            BaseVariant::Maxi => &MAXI,
        }
    }
}

/// Immutable per-variant configuration.
///
/// Invariant: `labels` length is fixed per variant and label order defines
/// cell index.
#[derive(Debug)]
pub struct VariantConfig {
    /// Ordered scorecard cell labels.
    pub labels: &'static [&'static str],
    /// Labels of derived (non-committable) cells: Sum, Bonus, Total.
    pub derived_labels: &'static [&'static str],
    /// Index of the last upper-section category (Sixes).
    pub upper_section_end: usize,
    /// Upper-section sum needed to earn the bonus.
    pub bonus_threshold: i32,
    /// Bonus awarded at or above the threshold.
    pub bonus_amount: i32,
    /// Number of dice rolled per turn.
    pub dice_count: usize,
    /// Maximum rolls per turn.
    pub max_rolls: u32,
}

impl VariantConfig {
    /// Whether a label names a derived cell (Sum, Bonus, Total).
    pub fn is_derived(&self, label: &str) -> bool {
        self.derived_labels.contains(&label)
    }

    /// Cell index of a label, if present on this board.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| *l == label)
    }

    /// Number of cells on this board.
    pub fn cell_count(&self) -> usize {
        self.labels.len()
    }
}

/// Derived labels shared by every board.
const DERIVED: &[&str] = &["Sum", "Bonus", "Total"];

/// Classic Yatzy board.
pub static ORDINARY: VariantConfig = VariantConfig {
    labels: &[
        "Ones", "Twos", "Threes", "Fours", "Fives", "Sixes",
        "Sum", "Bonus",
        "Pair", "Two Pairs", "Three of Kind", "Four of Kind",
        "House", "Small Straight", "Large Straight",
        "Chance", "Yatzy", "Total",
    ],
    derived_labels: DERIVED,
    upper_section_end: 5,
    bonus_threshold: 63,
    bonus_amount: 50,
    dice_count: 5,
    max_rolls: 3,
};

/// Short 4-dice board.
pub static MINI: VariantConfig = VariantConfig {
    labels: &[
        "Ones", "Twos", "Threes", "Fours", "Fives", "Sixes",
        "Sum", "Bonus",
        "Pair", "Two Pairs", "Three of Kind",
        "Small Straight", "Middle Straight", "Large Straight",
        "Chance", "Yatzy", "Total",
    ],
    derived_labels: DERIVED,
    upper_section_end: 5,
    bonus_threshold: 50,
    bonus_amount: 25,
    dice_count: 4,
    max_rolls: 3,
};

/// 6-dice Maxi board.
pub static MAXI: VariantConfig = VariantConfig {
    labels: &[
        "Ones", "Twos", "Threes", "Fours", "Fives", "Sixes",
        "Sum", "Bonus",
        "Pair", "Two Pairs", "Three Pairs",
        "Three of Kind", "Four of Kind", "Five of Kind",
        "Small Straight", "Large Straight", "Full Straight",
        "House 3-2", "House 3-3", "House 2-4",
        "Chance", "Maxi Yatzy", "Total",
    ],
    derived_labels: DERIVED,
    upper_section_end: 5,
    bonus_threshold: 84,
    bonus_amount: 100,
    dice_count: 6,
    max_rolls: 3,
};
