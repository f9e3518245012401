//! Protocol Messages
//!
//! Wire shapes for inbound player actions and outbound state snapshots.
//! JSON field names follow the original client protocol (camelCase, tagged
//! `action` discriminators); bincode helpers exist for the flat snapshot
//! struct only, since untagged enums need a self-describing format.

use serde::{Deserialize, Serialize};

use crate::game::player::PlayerId;
use crate::game::scorecard::Cell;
use crate::game::session::GameSession;

// =============================================================================
// INBOUND ACTIONS
// =============================================================================

/// An action delivered by the transport on behalf of a seat or observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PlayerAction {
    /// Join matchmaking: first open session of matching type/size, else new.
    #[serde(rename_all = "camelCase")]
    CreateOrJoin {
        /// Variant key ("Ordinary", "Maxi", ...).
        game_type: String,
        /// Seat capacity of the requested session.
        max_players: usize,
        /// Display name for the seat.
        username: String,
    },

    /// Report a dice roll. The client rolls; the server validates and stores.
    #[serde(rename_all = "camelCase")]
    Roll {
        /// Target session.
        game_id: u32,
        /// Rolled dice values.
        dice: Vec<u8>,
        /// Which dice were held from the previous roll (for the move log).
        kept: Vec<bool>,
    },

    /// Commit the current dice to a category.
    #[serde(rename_all = "camelCase")]
    Select {
        /// Target session.
        game_id: u32,
        /// Category label.
        label: String,
        /// Score computed for the dice at selection time.
        score: i32,
    },

    /// Watch a session without a seat.
    #[serde(rename_all = "camelCase")]
    Spectate {
        /// Target session.
        game_id: u32,
        /// Observer display name (for the move log).
        username: String,
    },

    /// Ask for the open-session list.
    RequestGames,

    /// Leave any session and stop spectating.
    Leave,
}

impl PlayerAction {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// OUTBOUND MESSAGES
// =============================================================================

/// Snapshot action discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotAction {
    /// Routine state sync.
    #[serde(rename = "onGameUpdate")]
    GameUpdate,
    /// All seats filled, match begins.
    #[serde(rename = "onGameStart")]
    GameStart,
    /// Final snapshot of a finished match.
    #[serde(rename = "onGameFinished")]
    GameFinished,
    /// Lobby list payload.
    #[serde(rename = "onRequestGames")]
    RequestGames,
}

/// Messages pushed to clients. Discriminated on the wire by the embedded
/// `action` field, matching the original flat-object protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// One session's full state.
    Game(GameSnapshot),
    /// The open-session list.
    GameList(LobbyList),
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// One seat's serialized state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Identity as UUID string.
    pub id: String,
    /// Display name.
    pub username: String,
    /// False once aborted.
    pub is_active: bool,
    /// Scorecard cells.
    pub cells: Vec<Cell>,
    /// Total score including bonus.
    pub score: i32,
    /// Upper-section sum.
    pub upper_sum: i32,
    /// Upper-section bonus earned.
    pub bonus_achieved: bool,
}

/// Full on-the-wire session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Message discriminator.
    pub action: SnapshotAction,
    /// Session id.
    pub game_id: u32,
    /// Variant key.
    pub game_type: String,
    /// Seat capacity.
    pub nr_players: usize,
    /// Connected (active) player count.
    pub connected: usize,
    /// Seat identities as UUID strings; empty string for open seats.
    pub player_ids: Vec<String>,
    /// Seat display names; empty string for open seats.
    pub user_names: Vec<String>,
    /// Per-seat state; `None` for open seats.
    pub players: Vec<Option<PlayerSnapshot>>,
    /// Whether the match has begun.
    pub game_started: bool,
    /// Whether the match is over.
    pub game_finished: bool,
    /// Index of the seat to move.
    pub player_to_move: usize,
    /// Current dice.
    pub dice_values: Vec<u8>,
    /// Rolls taken this turn.
    pub roll_count: u32,
    /// Turn counter.
    pub turn_number: u32,
    /// Per-seat aborted flags.
    pub aborted_players: Vec<bool>,
}

/// Open-session list message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyList {
    /// Always `RequestGames`.
    pub action: SnapshotAction,
    /// Snapshots of every non-finished session.
    #[serde(rename = "Games")]
    pub games: Vec<GameSnapshot>,
}

impl LobbyList {
    /// Build a lobby list message.
    pub fn new(games: Vec<GameSnapshot>) -> Self {
        Self {
            action: SnapshotAction::RequestGames,
            games,
        }
    }
}

impl GameSnapshot {
    /// Capture a session's state under a given action discriminator.
    pub fn from_session(session: &GameSession, action: SnapshotAction) -> Self {
        let players: Vec<Option<PlayerSnapshot>> = session
            .seats()
            .iter()
            .map(|seat| {
                seat.as_ref().map(|p| PlayerSnapshot {
                    id: p.id.to_string(),
                    username: p.username.clone(),
                    is_active: p.active,
                    cells: p.scorecard.cells().to_vec(),
                    score: p.scorecard.total_score(),
                    upper_sum: p.scorecard.upper_sum(),
                    bonus_achieved: p.scorecard.bonus_achieved(),
                })
            })
            .collect();

        let player_ids = session
            .seats()
            .iter()
            .map(|s| s.as_ref().map(|p| p.id.to_string()).unwrap_or_default())
            .collect();
        let user_names = session
            .seats()
            .iter()
            .map(|s| s.as_ref().map(|p| p.username.clone()).unwrap_or_default())
            .collect();

        Self {
            action,
            game_id: session.id(),
            game_type: session.variant().key().to_string(),
            nr_players: session.capacity(),
            connected: session.connected(),
            player_ids,
            user_names,
            players,
            game_started: session.started(),
            game_finished: session.finished(),
            player_to_move: session.player_to_move(),
            dice_values: session.dice().to_vec(),
            roll_count: session.roll_count(),
            turn_number: session.turn_number(),
            aborted_players: session.aborted().to_vec(),
        }
    }

    /// Whether a given identity holds a seat in this snapshot.
    pub fn has_seat(&self, id: &PlayerId) -> bool {
        let id = id.to_string();
        self.player_ids.iter().any(|p| *p == id)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::Player;
    use crate::game::variant::Variant;

    fn demo_session() -> GameSession {
        let mut session = GameSession::new(7, Variant::Ordinary, 2);
        session
            .add_player(Player::new(PlayerId::new([1; 16]), "ada", Variant::Ordinary))
            .unwrap();
        session
    }

    #[test]
    fn test_snapshot_shape() {
        let session = demo_session();
        let snap = GameSnapshot::from_session(&session, SnapshotAction::GameUpdate);

        assert_eq!(snap.game_id, 7);
        assert_eq!(snap.game_type, "Ordinary");
        assert_eq!(snap.nr_players, 2);
        assert_eq!(snap.connected, 1);
        assert!(snap.players[0].is_some());
        assert!(snap.players[1].is_none());
        assert_eq!(snap.player_ids[1], "");
        assert_eq!(snap.dice_values, vec![0; 5]);
        assert!(snap.has_seat(&PlayerId::new([1; 16])));
        assert!(!snap.has_seat(&PlayerId::new([9; 16])));
    }

    #[test]
    fn test_snapshot_action_wire_names() {
        let session = demo_session();
        let snap = GameSnapshot::from_session(&session, SnapshotAction::GameFinished);
        let json = ServerMessage::Game(snap).to_json().unwrap();
        assert!(json.contains("\"action\":\"onGameFinished\""));
        assert!(json.contains("\"gameId\":7"));
        assert!(json.contains("\"isDerived\""));
    }

    #[test]
    fn test_lobby_list_wire_shape() {
        let session = demo_session();
        let list = LobbyList::new(vec![GameSnapshot::from_session(
            &session,
            SnapshotAction::GameUpdate,
        )]);
        let json = ServerMessage::GameList(list).to_json().unwrap();
        assert!(json.contains("\"action\":\"onRequestGames\""));
        assert!(json.contains("\"Games\":["));
    }

    #[test]
    fn test_server_message_json_roundtrip() {
        let session = demo_session();
        let snap = GameSnapshot::from_session(&session, SnapshotAction::GameUpdate);
        let json = ServerMessage::Game(snap).to_json().unwrap();
        let parsed = ServerMessage::from_json(&json).unwrap();
        match parsed {
            ServerMessage::Game(g) => assert_eq!(g.game_id, 7),
            ServerMessage::GameList(_) => panic!("wrong message type"),
        }
    }

    #[test]
    fn test_player_action_json_roundtrip() {
        let action = PlayerAction::Select {
            game_id: 3,
            label: "Two Pairs".into(),
            score: 14,
        };
        let json = action.to_json().unwrap();
        assert!(json.contains("\"action\":\"select\""));
        let parsed = PlayerAction::from_json(&json).unwrap();
        match parsed {
            PlayerAction::Select { game_id, label, score } => {
                assert_eq!(game_id, 3);
                assert_eq!(label, "Two Pairs");
                assert_eq!(score, 14);
            }
            _ => panic!("wrong action type"),
        }
    }

    #[test]
    fn test_snapshot_binary_roundtrip() {
        let session = demo_session();
        let snap = GameSnapshot::from_session(&session, SnapshotAction::GameUpdate);
        let bytes = snap.to_bytes().unwrap();
        let parsed = GameSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.game_id, snap.game_id);
        assert_eq!(parsed.player_ids, snap.player_ids);
    }
}
