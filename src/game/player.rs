//! Player Identity and Seat Data

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::scorecard::Scorecard;
use crate::game::variant::Variant;

/// Unique player/observer identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create a fresh random identity.
    pub fn random() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        uuid::Uuid::from_bytes(self.0).fmt(f)
    }
}

/// A seated player: identity, display name, active flag and scorecard.
///
/// Players are never removed from their seat mid-match; a disconnect only
/// clears `active` so historical display and final scoring keep working.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Identity the transport layer addresses this player by.
    pub id: PlayerId,
    /// Display name.
    pub username: String,
    /// False once disconnected or aborted.
    pub active: bool,
    /// The player's scorecard.
    pub scorecard: Scorecard,
}

impl Player {
    /// Create an active player with an empty scorecard.
    pub fn new(id: PlayerId, username: impl Into<String>, variant: Variant) -> Self {
        Self {
            id,
            username: username.into(),
            active: true,
            scorecard: Scorecard::new(variant),
        }
    }

    /// Current total score.
    pub fn score(&self) -> i32 {
        self.scorecard.total_score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_ordering() {
        let id1 = PlayerId::new([0; 16]);
        let id2 = PlayerId::new([1; 16]);
        let id3 = PlayerId::new([0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        assert!(id1 < id2);
        assert!(id1 < id3);
        assert!(id3 < id2);
    }

    #[test]
    fn test_player_id_uuid_roundtrip() {
        let id = PlayerId::random();
        let parsed = PlayerId::from_uuid_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_new_player_is_active_with_empty_card() {
        let player = Player::new(PlayerId::new([7; 16]), "ada", Variant::Ordinary);
        assert!(player.active);
        assert_eq!(player.score(), 0);
        assert!(!player.scorecard.is_complete());
    }
}
