//! Player Scorecard
//!
//! Ordered cells per variant board plus the derived Sum/Bonus/Total cells.
//! Owns preview and commit mechanics for a single player; the committed value
//! always comes from the caller so the score that was valid for the dice at
//! commit time is preserved exactly.

use serde::{Deserialize, Serialize};

use crate::game::score;
use crate::game::variant::Variant;

/// Sentinel for an empty (unset) cell value.
pub const EMPTY_CELL: i32 = -1;

/// A single scorecard cell.
///
/// A non-derived cell's value is only meaningful once `fixed` is true; while
/// unfixed it may hold a potential-score preview for the current roll.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Position on the board.
    pub index: usize,
    /// Category label.
    pub label: String,
    /// Committed score, preview, or `EMPTY_CELL`.
    pub value: i32,
    /// Committed by the player (always true for derived cells).
    pub fixed: bool,
    /// Derived cell (Sum, Bonus, Total), never player-committed.
    pub is_derived: bool,
}

/// Scorecard errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScorecardError {
    /// Cell already committed.
    #[error("category '{0}' is already fixed")]
    AlreadyFixed(String),

    /// Label not on this board, or a derived cell.
    #[error("unknown or non-selectable category '{0}'")]
    UnknownCategory(String),
}

/// One player's scorecard.
///
/// Aggregates (`upper_sum`, `total_score`, `bonus_achieved`) are always
/// recomputed from the cells, never hand-edited.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scorecard {
    variant: Variant,
    cells: Vec<Cell>,
    upper_sum: i32,
    total_score: i32,
    bonus_achieved: bool,
}

impl Scorecard {
    /// Create an empty scorecard for a variant.
    ///
    /// Non-derived cells start empty and unfixed; derived cells are fixed
    /// from the start, with the Bonus cell preloaded to the full deficit.
    pub fn new(variant: Variant) -> Self {
        let config = variant.config();
        let cells = config
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let is_derived = config.is_derived(label);
                Cell {
                    index,
                    label: (*label).to_string(),
                    value: if is_derived { 0 } else { EMPTY_CELL },
                    fixed: is_derived,
                    is_derived,
                }
            })
            .collect();

        let mut card = Self {
            variant,
            cells,
            upper_sum: 0,
            total_score: 0,
            bonus_achieved: false,
        };
        card.recompute_derived();
        card
    }

    /// Variant this scorecard belongs to.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// All cells in board order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Upper-section sum from committed cells.
    pub fn upper_sum(&self) -> i32 {
        self.upper_sum
    }

    /// Total score including bonus.
    pub fn total_score(&self) -> i32 {
        self.total_score
    }

    /// Whether the upper-section bonus has been earned.
    pub fn bonus_achieved(&self) -> bool {
        self.bonus_achieved
    }

    /// Fill every unfixed, non-derived cell with its potential score for the
    /// given dice. Overwrites any prior preview; empty or all-zero dice clear
    /// the preview instead.
    pub fn preview_scores(&mut self, dice: &[u8]) {
        if dice.is_empty() || dice.iter().all(|d| *d == 0) {
            self.clear_preview();
            return;
        }
        let base = self.variant.base();
        for cell in &mut self.cells {
            if !cell.fixed && !cell.is_derived {
                cell.value = score::score(&cell.label, dice, base);
            }
        }
        // Previews never flow into Sum/Total; derived cells stay as-is.
    }

    /// Reset every unfixed, non-derived cell to empty, then recompute the
    /// derived cells so the Bonus deficit stays correct.
    pub fn clear_preview(&mut self) {
        for cell in &mut self.cells {
            if !cell.fixed && !cell.is_derived {
                cell.value = EMPTY_CELL;
            }
        }
        self.recompute_derived();
    }

    /// Commit a caller-computed score to a category.
    pub fn commit(&mut self, label: &str, value: i32) -> Result<(), ScorecardError> {
        let config = self.variant.config();
        let index = config
            .label_index(label)
            .filter(|_| !config.is_derived(label))
            .ok_or_else(|| ScorecardError::UnknownCategory(label.to_string()))?;

        let cell = &mut self.cells[index];
        if cell.fixed {
            return Err(ScorecardError::AlreadyFixed(label.to_string()));
        }
        cell.value = value;
        cell.fixed = true;
        self.recompute_derived();
        Ok(())
    }

    /// Recompute Sum, Bonus and Total from the committed cells.
    ///
    /// Only positive values of player-committed cells count toward the
    /// aggregates. Recomputation never changes the fixed flag of a
    /// non-derived cell.
    pub fn recompute_derived(&mut self) {
        let config = self.variant.config();
        let upper_end = config.upper_section_end;

        let upper_sum: i32 = self.cells[..=upper_end]
            .iter()
            .filter(|c| c.fixed && !c.is_derived && c.value > 0)
            .map(|c| c.value)
            .sum();

        let bonus_achieved = upper_sum >= config.bonus_threshold;
        let all_upper_fixed = self.cells[..=upper_end].iter().all(|c| c.fixed);

        let lower_sum: i32 = self.cells[upper_end + 1..]
            .iter()
            .filter(|c| c.fixed && !c.is_derived && c.value > 0)
            .map(|c| c.value)
            .sum();

        let total = upper_sum
            + if bonus_achieved { config.bonus_amount } else { 0 }
            + lower_sum;

        if let Some(idx) = config.label_index("Sum") {
            self.cells[idx].value = upper_sum;
            self.cells[idx].fixed = true;
        }
        if let Some(idx) = config.label_index("Bonus") {
            self.cells[idx].value = if bonus_achieved {
                config.bonus_amount
            } else if all_upper_fixed {
                0
            } else {
                upper_sum - config.bonus_threshold
            };
            self.cells[idx].fixed = true;
        }
        if let Some(idx) = config.label_index("Total") {
            self.cells[idx].value = total;
            self.cells[idx].fixed = true;
        }

        self.upper_sum = upper_sum;
        self.total_score = total;
        self.bonus_achieved = bonus_achieved;
    }

    /// True once every cell is committed or derived.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.fixed || c.is_derived)
    }

    fn cell_value(&self, label: &str) -> Option<i32> {
        let idx = self.variant.config().label_index(label)?;
        Some(self.cells[idx].value)
    }

    /// Current Bonus cell value (deficit, zero, or the bonus amount).
    pub fn bonus_cell(&self) -> i32 {
        self.cell_value("Bonus").unwrap_or(0)
    }
}
