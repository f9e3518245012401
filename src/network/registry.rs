//! Session Registry
//!
//! Owns every live session and routes inbound actions to them: matchmaking,
//! turn actions, spectators, disconnects and the finish/notification path.
//! Single-threaded by design; the server loop feeds it one action at a time
//! and the collaborators (transport, move log, leaderboard) are fire-and-
//! forget, so no registry call ever blocks on I/O.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::game::player::{Player, PlayerId};
use crate::game::session::{GameSession, SessionError};
use crate::game::variant::Variant;
use crate::network::protocol::{GameSnapshot, LobbyList, PlayerAction, ServerMessage, SnapshotAction};
use crate::network::transport::Transport;
use crate::service::leaderboard::{Leaderboard, TopScoreEntry};
use crate::service::move_log::{MoveAction, MoveLog, MoveRecord};

/// Registry errors. All are caller mistakes reported back on the inbound
/// path; none of them damage registry or session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No session with that id.
    #[error("unknown game {0}")]
    UnknownGame(u32),

    /// Variant key the registry does not recognize.
    #[error("unknown game type {0:?}")]
    UnknownVariant(String),

    /// The acting identity holds no seat in the session.
    #[error("not seated in game {0}")]
    NotSeated(u32),

    /// The session is already over.
    #[error("game {0} is finished")]
    GameFinished(u32),

    /// The session rejected the action.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Routes every inbound action, owns all sessions and spectator sets.
pub struct SessionRegistry {
    games: BTreeMap<u32, GameSession>,
    spectators: BTreeMap<u32, BTreeSet<PlayerId>>,
    next_game_id: u32,
    transport: Arc<dyn Transport>,
    move_log: Arc<dyn MoveLog>,
    leaderboard: Arc<dyn Leaderboard>,
}

impl SessionRegistry {
    /// Create an empty registry wired to its collaborators.
    pub fn new(
        transport: Arc<dyn Transport>,
        move_log: Arc<dyn MoveLog>,
        leaderboard: Arc<dyn Leaderboard>,
    ) -> Self {
        Self {
            games: BTreeMap::new(),
            spectators: BTreeMap::new(),
            next_game_id: 1,
            transport,
            move_log,
            leaderboard,
        }
    }

    /// Number of live sessions.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// A live session by id.
    pub fn game(&self, game_id: u32) -> Option<&GameSession> {
        self.games.get(&game_id)
    }

    /// Spectator identities of a session.
    pub fn spectators_of(&self, game_id: u32) -> Option<&BTreeSet<PlayerId>> {
        self.spectators.get(&game_id)
    }

    /// Single inbound entry point: route one action from one identity.
    pub fn dispatch(&mut self, id: PlayerId, action: PlayerAction) -> Result<(), RegistryError> {
        match action {
            PlayerAction::CreateOrJoin { game_type, max_players, username } => {
                self.create_or_join(id, &game_type, max_players, &username)?;
                Ok(())
            }
            PlayerAction::Roll { game_id, dice, kept } => self.handle_roll(id, game_id, &dice, &kept),
            PlayerAction::Select { game_id, label, score } => {
                self.handle_select(id, game_id, &label, score)
            }
            PlayerAction::Spectate { game_id, username } => {
                self.add_spectator(id, game_id, &username)
            }
            PlayerAction::RequestGames => {
                self.send_lobby(&id);
                Ok(())
            }
            PlayerAction::Leave => {
                self.handle_disconnect(&id);
                Ok(())
            }
        }
    }

    /// Seat an identity: first waiting session of matching variant and
    /// capacity with room, else a fresh one.
    ///
    /// The identity is first forced out of any session it already occupies,
    /// so a client starting over cannot hold two seats.
    pub fn create_or_join(
        &mut self,
        id: PlayerId,
        variant_key: &str,
        capacity: usize,
        username: &str,
    ) -> Result<u32, RegistryError> {
        let variant = Variant::from_key(variant_key)
            .ok_or_else(|| RegistryError::UnknownVariant(variant_key.to_string()))?;
        let capacity = capacity.max(1);

        self.handle_disconnect(&id);

        let open = self
            .games
            .values()
            .find(|g| {
                !g.started() && !g.finished() && g.variant() == variant && g.capacity() == capacity
            })
            .map(GameSession::id);
        let game_id = match open {
            Some(existing) => existing,
            None => {
                let new_id = self.next_game_id;
                self.next_game_id += 1;
                self.games.insert(new_id, GameSession::new(new_id, variant, capacity));
                info!(game_id = new_id, variant = variant.key(), capacity, "session created");
                new_id
            }
        };

        let session = self
            .games
            .get_mut(&game_id)
            .ok_or(RegistryError::UnknownGame(game_id))?;
        let seat = session.add_player(Player::new(id, username, variant))?;
        info!(game_id, seat, username, "player seated");

        if session.started() {
            let usernames = session
                .seats()
                .iter()
                .flatten()
                .map(|p| p.username.clone())
                .collect();
            self.move_log.record(MoveRecord::new(
                game_id,
                variant.key(),
                None,
                session.turn_number(),
                MoveAction::GameStart { usernames },
            ));
            self.notify_session(game_id, SnapshotAction::GameStart);
        } else {
            self.notify_session(game_id, SnapshotAction::GameUpdate);
        }
        self.broadcast_lobby();
        Ok(game_id)
    }

    /// Apply a roll reported by a seated identity.
    pub fn handle_roll(
        &mut self,
        id: PlayerId,
        game_id: u32,
        dice: &[u8],
        kept: &[bool],
    ) -> Result<(), RegistryError> {
        let session = self
            .games
            .get_mut(&game_id)
            .ok_or(RegistryError::UnknownGame(game_id))?;
        let seat = session.seat_of(&id).ok_or(RegistryError::NotSeated(game_id))?;
        session.roll(seat, dice)?;

        let record = MoveRecord::new(
            game_id,
            session.variant().key(),
            Some(seat),
            session.turn_number(),
            MoveAction::Roll { dice: dice.to_vec(), kept: kept.to_vec() },
        );
        self.move_log.record(record);
        self.notify_session(game_id, SnapshotAction::GameUpdate);
        Ok(())
    }

    /// Commit a selection for a seated identity; runs the finish path when
    /// the selection completes the match.
    pub fn handle_select(
        &mut self,
        id: PlayerId,
        game_id: u32,
        label: &str,
        score: i32,
    ) -> Result<(), RegistryError> {
        let session = self
            .games
            .get_mut(&game_id)
            .ok_or(RegistryError::UnknownGame(game_id))?;
        let seat = session.seat_of(&id).ok_or(RegistryError::NotSeated(game_id))?;
        // Stamp the record with the turn the move was made in, not the turn
        // the selection advances to.
        let turn_number = session.turn_number();
        session.select(seat, label, score)?;

        let record = MoveRecord::new(
            game_id,
            session.variant().key(),
            Some(seat),
            turn_number,
            MoveAction::Select { label: label.to_string(), score },
        );
        self.move_log.record(record);

        if self.games.get(&game_id).is_some_and(GameSession::finished) {
            self.finish_game(game_id);
        } else {
            self.notify_session(game_id, SnapshotAction::GameUpdate);
        }
        Ok(())
    }

    /// Register an observer on a running session and send it an immediate
    /// snapshot.
    pub fn add_spectator(
        &mut self,
        id: PlayerId,
        game_id: u32,
        username: &str,
    ) -> Result<(), RegistryError> {
        let session = self
            .games
            .get(&game_id)
            .ok_or(RegistryError::UnknownGame(game_id))?;
        if session.finished() {
            return Err(RegistryError::GameFinished(game_id));
        }

        self.spectators.entry(game_id).or_default().insert(id);
        self.move_log.record(MoveRecord::new(
            game_id,
            session.variant().key(),
            None,
            session.turn_number(),
            MoveAction::Spectate { username: username.to_string() },
        ));
        debug!(game_id, username, "spectator added");

        let snapshot = GameSnapshot::from_session(session, SnapshotAction::GameUpdate);
        self.transport.send(&id, &ServerMessage::Game(snapshot));
        Ok(())
    }

    /// Drop an observer from a session, pruning the empty set.
    pub fn remove_spectator(&mut self, id: &PlayerId, game_id: u32) {
        if let Some(set) = self.spectators.get_mut(&game_id) {
            set.remove(id);
            if set.is_empty() {
                self.spectators.remove(&game_id);
            }
        }
    }

    /// Handle an identity going away: abort its seats, stop its spectating,
    /// finish sessions that can no longer continue.
    pub fn handle_disconnect(&mut self, id: &PlayerId) {
        let seated: Vec<u32> = self
            .games
            .values()
            .filter(|g| {
                g.seat_of(id)
                    .and_then(|seat| g.seat(seat))
                    .is_some_and(|p| p.active)
            })
            .map(GameSession::id)
            .collect();

        let mut changed = false;
        for game_id in seated {
            let Some(session) = self.games.get_mut(&game_id) else {
                continue;
            };
            let Some(seat) = session.seat_of(id) else {
                continue;
            };
            let turn_number = session.turn_number();
            if let Err(err) = session.mark_aborted(seat) {
                warn!(game_id, seat, %err, "abort failed");
                continue;
            }

            let record = MoveRecord::new(
                game_id,
                session.variant().key(),
                Some(seat),
                turn_number,
                MoveAction::Disconnect,
            );
            self.move_log.record(record);
            info!(game_id, seat, "seat left");

            let (started, finished) = (session.started(), session.finished());
            if finished && started {
                // finish_game broadcasts the lobby itself.
                self.finish_game(game_id);
            } else if finished {
                // Never-started session drained by its last waiting player.
                self.games.remove(&game_id);
                self.spectators.remove(&game_id);
                changed = true;
            } else {
                self.notify_session(game_id, SnapshotAction::GameUpdate);
                changed = true;
            }
        }

        let watching: Vec<u32> = self
            .spectators
            .iter()
            .filter(|(_, set)| set.contains(id))
            .map(|(game_id, _)| *game_id)
            .collect();
        for game_id in watching {
            self.remove_spectator(id, game_id);
            changed = true;
        }

        if changed {
            self.broadcast_lobby();
        }
    }

    /// Snapshots of every live session, for the lobby.
    pub fn list_games(&self) -> Vec<GameSnapshot> {
        self.games
            .values()
            .filter(|g| !g.finished())
            .map(|g| GameSnapshot::from_session(g, SnapshotAction::GameUpdate))
            .collect()
    }

    /// Send the lobby list to one identity.
    pub fn send_lobby(&self, to: &PlayerId) {
        let message = ServerMessage::GameList(LobbyList::new(self.list_games()));
        self.transport.send(to, &message);
    }

    /// Push the lobby list to everyone connected.
    pub fn broadcast_lobby(&self) {
        let message = ServerMessage::GameList(LobbyList::new(self.list_games()));
        self.transport.broadcast(&message);
    }

    /// Send one session's snapshot to its seats and spectators.
    fn notify_session(&self, game_id: u32, action: SnapshotAction) {
        let Some(session) = self.games.get(&game_id) else {
            return;
        };
        let message = ServerMessage::Game(GameSnapshot::from_session(session, action));
        for id in self.recipients(session, game_id) {
            self.transport.send(&id, &message);
        }
    }

    /// Run the finish path for a completed session.
    ///
    /// Order matters and follows the notification contract: final state
    /// update, move-log game end, top-score submissions, the finished
    /// notification to every seat and spectator exactly once, then removal
    /// and a lobby refresh.
    fn finish_game(&mut self, game_id: u32) {
        let Some(session) = self.games.remove(&game_id) else {
            return;
        };
        info!(game_id, "session finished");
        let recipients = self.recipients(&session, game_id);

        let update = ServerMessage::Game(GameSnapshot::from_session(
            &session,
            SnapshotAction::GameUpdate,
        ));
        for id in &recipients {
            self.transport.send(id, &update);
        }

        let scores: Vec<i32> = session
            .seats()
            .iter()
            .map(|s| s.as_ref().map(Player::score).unwrap_or(0))
            .collect();
        self.move_log.record(MoveRecord::new(
            game_id,
            session.variant().key(),
            None,
            session.turn_number(),
            MoveAction::GameEnd { scores: scores.clone() },
        ));

        for player in session.seats().iter().flatten() {
            if player.score() > 0 {
                self.leaderboard.submit(
                    session.variant(),
                    TopScoreEntry::new(player.username.clone(), player.score()),
                );
            }
        }

        let finished = ServerMessage::Game(GameSnapshot::from_session(
            &session,
            SnapshotAction::GameFinished,
        ));
        for id in &recipients {
            self.transport.send(id, &finished);
        }

        self.spectators.remove(&game_id);
        self.broadcast_lobby();
    }

    fn recipients(&self, session: &GameSession, game_id: u32) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = session.seats().iter().flatten().map(|p| p.id).collect();
        if let Some(watchers) = self.spectators.get(&game_id) {
            ids.extend(watchers.iter().copied());
        }
        ids
    }
}
