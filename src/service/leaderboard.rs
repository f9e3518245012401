//! Top-Score Board
//!
//! Per-variant high-score lists. The registry submits every finishing
//! player with a positive total; the board keeps entries sorted and
//! answers ranked queries.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::variant::Variant;

/// One finished result worth remembering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopScoreEntry {
    /// Display name of the player.
    pub username: String,
    /// Final total including bonus.
    pub score: i32,
    /// Wall-clock time the match finished.
    pub achieved_at: DateTime<Utc>,
}

impl TopScoreEntry {
    /// Build an entry stamped with the current time.
    pub fn new(username: impl Into<String>, score: i32) -> Self {
        Self {
            username: username.into(),
            score,
            achieved_at: Utc::now(),
        }
    }
}

/// High-score sink and query surface. Implementations must not block.
pub trait Leaderboard: Send + Sync {
    /// Record one finished result under a variant. Returns whether the
    /// entry made it onto the board.
    fn submit(&self, variant: Variant, entry: TopScoreEntry) -> bool;

    /// Best results for a variant, highest first, at most `limit`.
    fn top(&self, variant: Variant, limit: usize) -> Vec<TopScoreEntry>;
}

/// In-memory board keyed by variant. Ties keep submission order.
#[derive(Debug, Default)]
pub struct InMemoryLeaderboard {
    boards: Mutex<BTreeMap<Variant, Vec<TopScoreEntry>>>,
}

impl InMemoryLeaderboard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Leaderboard for InMemoryLeaderboard {
    fn submit(&self, variant: Variant, entry: TopScoreEntry) -> bool {
        info!(
            variant = variant.key(),
            username = %entry.username,
            score = entry.score,
            "top score submitted"
        );
        let Ok(mut boards) = self.boards.lock() else {
            return false;
        };
        let board = boards.entry(variant).or_default();
        // Stable insert keeps earlier submissions ahead on ties.
        let pos = board.partition_point(|e| e.score >= entry.score);
        board.insert(pos, entry);
        true
    }

    fn top(&self, variant: Variant, limit: usize) -> Vec<TopScoreEntry> {
        self.boards
            .lock()
            .map(|boards| {
                boards
                    .get(&variant)
                    .map(|board| board.iter().take(limit).cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }
}

/// Board that forgets everything.
#[derive(Debug, Default)]
pub struct NullLeaderboard;

impl Leaderboard for NullLeaderboard {
    fn submit(&self, _variant: Variant, _entry: TopScoreEntry) -> bool {
        false
    }

    fn top(&self, _variant: Variant, _limit: usize) -> Vec<TopScoreEntry> {
        Vec::new()
    }
}
