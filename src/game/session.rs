//! Game Session
//!
//! One in-progress match: seat assignment, dice state, whose turn it is, and
//! the turn-advance state machine. Validates turn legality and applies
//! selections to the right scorecard; everything outside a single match
//! (routing, spectators, collaborator calls) lives in the registry.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::game::player::{Player, PlayerId};
use crate::game::scorecard::ScorecardError;
use crate::game::variant::Variant;

/// Session errors. Out-of-turn actions and re-committing a fixed cell are
/// rejected as named conditions, never fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Session is full.
    #[error("session is full")]
    SessionFull,

    /// Action from a seat that is not the seat to move.
    #[error("not seat {0}'s turn")]
    NotYourTurn(usize),

    /// Session has not started or is already finished.
    #[error("session is not in progress")]
    NotInProgress,

    /// No seated player at that index.
    #[error("no player at seat {0}")]
    SeatNotFound(usize),

    /// Scorecard rejected the commit.
    #[error(transparent)]
    Scorecard(#[from] ScorecardError),
}

/// High-level session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Seats still open.
    WaitingForPlayers,
    /// All seats filled, match running.
    InProgress,
    /// Match over, awaiting final notification.
    Finished,
}

/// A single match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    id: u32,
    variant: Variant,
    capacity: usize,
    seats: Vec<Option<Player>>,
    aborted: Vec<bool>,
    connected: usize,
    started: bool,
    finished: bool,
    player_to_move: usize,
    dice: Vec<u8>,
    roll_count: u32,
    turn_number: u32,
}

impl GameSession {
    /// Create a session waiting for players.
    pub fn new(id: u32, variant: Variant, capacity: usize) -> Self {
        let dice_count = variant.config().dice_count;
        Self {
            id,
            variant,
            capacity,
            seats: (0..capacity).map(|_| None).collect(),
            aborted: vec![false; capacity],
            connected: 0,
            started: false,
            finished: false,
            player_to_move: 0,
            dice: vec![0; dice_count],
            roll_count: 0,
            turn_number: 1,
        }
    }

    /// Session id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Session variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Seat capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Count of connected (active) players.
    pub fn connected(&self) -> usize {
        self.connected
    }

    /// Whether all seats have been filled and play has begun.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Whether the match is over.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        if self.finished {
            SessionState::Finished
        } else if self.started {
            SessionState::InProgress
        } else {
            SessionState::WaitingForPlayers
        }
    }

    /// Index of the seat to move.
    pub fn player_to_move(&self) -> usize {
        self.player_to_move
    }

    /// Current dice values.
    pub fn dice(&self) -> &[u8] {
        &self.dice
    }

    /// Rolls taken this turn.
    pub fn roll_count(&self) -> u32 {
        self.roll_count
    }

    /// Turn counter; increments once per full rotation.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Per-seat aborted flags.
    pub fn aborted(&self) -> &[bool] {
        &self.aborted
    }

    /// All seats in order.
    pub fn seats(&self) -> &[Option<Player>] {
        &self.seats
    }

    /// Seated player at an index.
    pub fn seat(&self, index: usize) -> Option<&Player> {
        self.seats.get(index).and_then(|s| s.as_ref())
    }

    /// Whether every seat is taken.
    pub fn is_full(&self) -> bool {
        self.connected >= self.capacity
    }

    /// Seat index held by an identity, seated or not active.
    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|p| p.id == *id))
    }

    /// Count of seats that are active and not aborted.
    pub fn active_count(&self) -> usize {
        (0..self.capacity).filter(|i| self.seat_is_active(*i)).count()
    }

    fn seat_is_active(&self, index: usize) -> bool {
        self.seats[index].as_ref().is_some_and(|p| p.active) && !self.aborted[index]
    }

    /// Seat a player. Starts the match when the last seat fills.
    pub fn add_player(&mut self, player: Player) -> Result<usize, SessionError> {
        let seat = self
            .seats
            .iter()
            .position(|s| s.is_none())
            .ok_or(SessionError::SessionFull)?;

        debug!(game_id = self.id, seat, player = %player.id, "seating player");
        self.seats[seat] = Some(player);
        self.aborted[seat] = false;
        self.connected += 1;
        if self.is_full() {
            self.started = true;
        }
        Ok(seat)
    }

    /// Apply a roll from a seat.
    ///
    /// The dice come from the client; a length mismatch is logged and stored
    /// as received rather than rejected. Roll-count overflow past the
    /// variant's max is likewise not a hard error here; the client is
    /// trusted to stop rolling.
    pub fn roll(&mut self, seat_index: usize, dice: &[u8]) -> Result<(), SessionError> {
        if !self.started || self.finished {
            return Err(SessionError::NotInProgress);
        }
        if seat_index != self.player_to_move {
            return Err(SessionError::NotYourTurn(seat_index));
        }
        if self.seats.get(seat_index).and_then(|s| s.as_ref()).is_none() {
            return Err(SessionError::SeatNotFound(seat_index));
        }

        let expected = self.variant.config().dice_count;
        if dice.len() != expected {
            warn!(
                game_id = self.id,
                expected,
                got = dice.len(),
                "dice length mismatch, storing as received"
            );
        }
        self.dice = dice.to_vec();
        self.roll_count += 1;

        // The acting seat gets a fresh preview; everyone else's stale
        // preview is cleared.
        for (i, seat) in self.seats.iter_mut().enumerate() {
            if let Some(player) = seat {
                if i == seat_index {
                    player.scorecard.preview_scores(dice);
                } else {
                    player.scorecard.clear_preview();
                }
            }
        }
        Ok(())
    }

    /// Commit a category selection for a seat, then hand the turn on.
    ///
    /// The score is the caller's: it was computed from the dice at commit
    /// time and is applied verbatim.
    pub fn select(&mut self, seat_index: usize, label: &str, score: i32) -> Result<(), SessionError> {
        if !self.started || self.finished {
            return Err(SessionError::NotInProgress);
        }
        if seat_index != self.player_to_move {
            return Err(SessionError::NotYourTurn(seat_index));
        }
        let player = self
            .seats
            .get_mut(seat_index)
            .and_then(|s| s.as_mut())
            .ok_or(SessionError::SeatNotFound(seat_index))?;

        player.scorecard.commit(label, score)?;
        debug!(game_id = self.id, seat = seat_index, label, score, "selection applied");

        if self.all_active_complete() {
            self.finished = true;
            return Ok(());
        }

        if let Some(player) = self.seats[seat_index].as_mut() {
            player.scorecard.clear_preview();
        }
        self.dice = vec![0; self.variant.config().dice_count];
        self.roll_count = 0;
        self.advance_to_next_active();
        Ok(())
    }

    /// Advance `player_to_move` to the next active, non-aborted seat.
    ///
    /// Scans from the following seat, wrapping once; the scan may land back
    /// on the starting seat (solo play, last survivor). The turn counter
    /// increments exactly when the scan wraps past seat 0 relative to the
    /// starting seat.
    pub fn advance_to_next_active(&mut self) {
        if self.finished {
            return;
        }
        let start = self.player_to_move;
        let mut next = start;
        loop {
            next = (next + 1) % self.capacity;
            if self.seat_is_active(next) {
                self.player_to_move = next;
                self.roll_count = 0;
                if next <= start {
                    self.turn_number += 1;
                    debug!(game_id = self.id, turn = self.turn_number, "new turn");
                }
                return;
            }
            if next == start {
                break;
            }
        }

        // No active seat anywhere.
        let threshold = usize::from(self.capacity > 1);
        if self.active_count() <= threshold {
            debug!(game_id = self.id, "no active seats remain, finishing");
            self.finished = true;
        } else {
            self.roll_count = 0;
        }
    }

    /// Deactivate a seat after a disconnect or explicit leave.
    ///
    /// The player stays in the seat array for historical display; only the
    /// active flag and the aborted marker change. Advances the turn if it
    /// was this seat's move and re-evaluates the finish condition.
    pub fn mark_aborted(&mut self, seat_index: usize) -> Result<(), SessionError> {
        let player = self
            .seats
            .get_mut(seat_index)
            .and_then(|s| s.as_mut())
            .ok_or(SessionError::SeatNotFound(seat_index))?;
        if !player.active {
            return Ok(());
        }

        player.active = false;
        self.aborted[seat_index] = true;
        self.connected = self.connected.saturating_sub(1);
        debug!(game_id = self.id, seat = seat_index, "seat aborted");

        if !self.finished {
            if self.player_to_move == seat_index {
                self.advance_to_next_active();
            }
            let active = self.active_count();
            if (self.capacity > 1 && active <= 1) || (self.capacity == 1 && active == 0) {
                self.finished = true;
            }
        }
        Ok(())
    }

    /// Whether every still-active seat has a complete scorecard.
    fn all_active_complete(&self) -> bool {
        let mut any_active = false;
        for i in 0..self.capacity {
            if self.seat_is_active(i) {
                any_active = true;
                let complete = self.seats[i]
                    .as_ref()
                    .is_some_and(|p| p.scorecard.is_complete());
                if !complete {
                    return false;
                }
            }
        }
        any_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::scorecard::EMPTY_CELL;

    fn seated_session(capacity: usize) -> GameSession {
        let mut session = GameSession::new(1, Variant::Ordinary, capacity);
        for i in 0..capacity {
            let id = PlayerId::new([i as u8 + 1; 16]);
            session
                .add_player(Player::new(id, format!("p{i}"), Variant::Ordinary))
                .unwrap();
        }
        session
    }

    #[test]
    fn test_starts_when_full() {
        let mut session = GameSession::new(1, Variant::Ordinary, 2);
        assert_eq!(session.state(), SessionState::WaitingForPlayers);

        let p1 = Player::new(PlayerId::new([1; 16]), "a", Variant::Ordinary);
        session.add_player(p1).unwrap();
        assert!(!session.started());

        let p2 = Player::new(PlayerId::new([2; 16]), "b", Variant::Ordinary);
        session.add_player(p2).unwrap();
        assert!(session.started());
        assert_eq!(session.state(), SessionState::InProgress);

        let extra = Player::new(PlayerId::new([3; 16]), "c", Variant::Ordinary);
        assert_eq!(session.add_player(extra), Err(SessionError::SessionFull));
    }

    #[test]
    fn test_roll_requires_turn() {
        let mut session = seated_session(2);
        assert_eq!(
            session.roll(1, &[1, 2, 3, 4, 5]),
            Err(SessionError::NotYourTurn(1))
        );
        session.roll(0, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(session.roll_count(), 1);
        assert_eq!(session.dice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_roll_before_start_rejected() {
        let mut session = GameSession::new(1, Variant::Ordinary, 2);
        let p1 = Player::new(PlayerId::new([1; 16]), "a", Variant::Ordinary);
        session.add_player(p1).unwrap();
        assert_eq!(
            session.roll(0, &[1, 2, 3, 4, 5]),
            Err(SessionError::NotInProgress)
        );
    }

    #[test]
    fn test_roll_refreshes_preview_and_clears_others() {
        let mut session = seated_session(2);
        session.roll(0, &[6, 6, 6, 6, 6]).unwrap();
        let acting = session.seat(0).unwrap();
        assert_eq!(acting.scorecard.cells()[5].value, 30);
        let other = session.seat(1).unwrap();
        assert_eq!(other.scorecard.cells()[5].value, EMPTY_CELL);
    }

    #[test]
    fn test_wrong_dice_length_stored_permissively() {
        let mut session = seated_session(2);
        session.roll(0, &[1, 2, 3]).unwrap();
        assert_eq!(session.dice(), &[1, 2, 3]);
    }

    #[test]
    fn test_select_advances_turn_and_resets_dice() {
        let mut session = seated_session(2);
        session.roll(0, &[6, 6, 6, 2, 2]).unwrap();
        session.select(0, "Sixes", 18).unwrap();

        assert_eq!(session.player_to_move(), 1);
        assert_eq!(session.roll_count(), 0);
        assert_eq!(session.dice(), &[0, 0, 0, 0, 0]);
        // Committed value survives; preview cleared.
        let p0 = session.seat(0).unwrap();
        assert_eq!(p0.scorecard.cells()[5].value, 18);
        assert_eq!(p0.scorecard.cells()[0].value, EMPTY_CELL);
    }

    #[test]
    fn test_select_out_of_turn_rejected_without_mutation() {
        let mut session = seated_session(2);
        assert_eq!(
            session.select(1, "Chance", 20),
            Err(SessionError::NotYourTurn(1))
        );
        let p1 = session.seat(1).unwrap();
        assert!(!p1.scorecard.cells().iter().any(|c| c.fixed && !c.is_derived));
    }

    #[test]
    fn test_double_select_reports_already_fixed() {
        let mut session = seated_session(1);
        session.select(0, "Chance", 20).unwrap();
        // Solo session: turn comes straight back to seat 0.
        let err = session.select(0, "Chance", 25).unwrap_err();
        assert!(matches!(err, SessionError::Scorecard(ScorecardError::AlreadyFixed(_))));
    }

    #[test]
    fn test_turn_counter_full_rotation() {
        let mut session = seated_session(3);
        assert_eq!(session.turn_number(), 1);
        session.select(0, "Chance", 10).unwrap();
        assert_eq!(session.turn_number(), 1);
        session.select(1, "Chance", 10).unwrap();
        assert_eq!(session.turn_number(), 1);
        session.select(2, "Chance", 10).unwrap();
        // Wrapped back to seat 0: one full rotation done.
        assert_eq!(session.turn_number(), 2);
        assert_eq!(session.player_to_move(), 0);
    }

    #[test]
    fn test_rotation_skips_aborted_seat() {
        let mut session = seated_session(3);
        session.mark_aborted(1).unwrap();
        assert!(!session.finished());

        assert_eq!(session.player_to_move(), 0);
        session.select(0, "Chance", 10).unwrap();
        assert_eq!(session.player_to_move(), 2);
        assert_eq!(session.turn_number(), 1);

        session.select(2, "Chance", 10).unwrap();
        assert_eq!(session.player_to_move(), 0);
        // Counter increments only once seat 2 hands back to seat 0.
        assert_eq!(session.turn_number(), 2);
    }

    #[test]
    fn test_abort_current_seat_advances() {
        let mut session = seated_session(3);
        session.mark_aborted(0).unwrap();
        assert_eq!(session.player_to_move(), 1);
        assert!(!session.finished());
        assert_eq!(session.connected(), 2);
    }

    #[test]
    fn test_abort_to_one_active_finishes_multiseat() {
        let mut session = seated_session(2);
        session.mark_aborted(0).unwrap();
        assert!(session.finished());
        // Seat data retained for historical display.
        assert!(session.seat(0).is_some());
        assert!(!session.seat(0).unwrap().active);
        assert!(session.aborted()[0]);
    }

    #[test]
    fn test_solo_session_survives_until_abort() {
        let mut session = seated_session(1);
        session.select(0, "Chance", 15).unwrap();
        assert!(!session.finished());
        assert_eq!(session.turn_number(), 2);

        session.mark_aborted(0).unwrap();
        assert!(session.finished());
    }

    #[test]
    fn test_completing_all_cards_finishes() {
        let mut session = seated_session(2);
        let labels: Vec<String> = Variant::Ordinary
            .config()
            .labels
            .iter()
            .filter(|l| !Variant::Ordinary.config().is_derived(l))
            .map(|l| l.to_string())
            .collect();

        for label in &labels {
            session.select(0, label, 1).unwrap();
            if session.finished() {
                break;
            }
            session.select(1, label, 1).unwrap();
        }
        assert!(session.finished());
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn test_actions_after_finish_rejected() {
        let mut session = seated_session(2);
        session.mark_aborted(0).unwrap();
        assert!(session.finished());
        assert_eq!(
            session.roll(1, &[1, 2, 3, 4, 5]),
            Err(SessionError::NotInProgress)
        );
    }

    #[test]
    fn test_seat_of_finds_inactive_players() {
        let mut session = seated_session(2);
        let id = PlayerId::new([1; 16]);
        assert_eq!(session.seat_of(&id), Some(0));
        session.mark_aborted(0).unwrap();
        assert_eq!(session.seat_of(&id), Some(0));
    }
}
