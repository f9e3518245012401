//! Move Logging
//!
//! Append-only record of everything that happens in a session, enough to
//! replay a match move by move. The registry reports; implementations decide
//! where records go. The in-memory implementation backs tests and the demo.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MoveAction {
    /// Match began with these seats filled.
    GameStart {
        /// Display names in seat order.
        usernames: Vec<String>,
    },
    /// A seat reported a roll.
    #[serde(rename_all = "camelCase")]
    Roll {
        /// Rolled dice values.
        dice: Vec<u8>,
        /// Which dice were held from the previous roll.
        kept: Vec<bool>,
    },
    /// A seat committed dice to a category.
    Select {
        /// Category label.
        label: String,
        /// Committed score.
        score: i32,
    },
    /// A seat disconnected or left mid-match.
    Disconnect,
    /// An observer started watching.
    Spectate {
        /// Observer display name.
        username: String,
    },
    /// Match ended.
    GameEnd {
        /// Final total per seat, in seat order.
        scores: Vec<i32>,
    },
}

/// One logged event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    /// Session the event belongs to.
    pub game_id: u32,
    /// Variant key of the session.
    pub game_type: String,
    /// Acting seat; `None` for session-level events.
    pub seat: Option<usize>,
    /// Turn counter when the event happened.
    pub turn_number: u32,
    /// The event itself.
    pub action: MoveAction,
    /// Wall-clock time of the event.
    pub timestamp: DateTime<Utc>,
}

impl MoveRecord {
    /// Build a record stamped with the current time.
    pub fn new(game_id: u32, game_type: &str, seat: Option<usize>, turn_number: u32, action: MoveAction) -> Self {
        Self {
            game_id,
            game_type: game_type.to_string(),
            seat,
            turn_number,
            action,
            timestamp: Utc::now(),
        }
    }
}

/// Sink for session events. Implementations must not block.
pub trait MoveLog: Send + Sync {
    /// Append one record.
    fn record(&self, record: MoveRecord);
}

/// In-memory log, ordered by insertion.
#[derive(Debug, Default)]
pub struct InMemoryMoveLog {
    records: Mutex<Vec<MoveRecord>>,
}

impl InMemoryMoveLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records for one session, in insertion order.
    pub fn for_game(&self, game_id: u32) -> Vec<MoveRecord> {
        self.records
            .lock()
            .map(|r| r.iter().filter(|m| m.game_id == game_id).cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MoveLog for InMemoryMoveLog {
    fn record(&self, record: MoveRecord) {
        debug!(
            game_id = record.game_id,
            turn = record.turn_number,
            "move logged"
        );
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

/// Log that drops everything. Useful when replay is not wanted.
#[derive(Debug, Default)]
pub struct NullMoveLog;

impl MoveLog for NullMoveLog {
    fn record(&self, _record: MoveRecord) {}
}
