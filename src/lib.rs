//! # Yatzy Session Server
//!
//! Turn-based multiplayer Yatzy session management: scoring rules, per-player
//! scorecards, the turn state machine, and the registry that routes every
//! inbound action to the right session.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    YATZY SESSION SERVER                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  game/           - Rules and turn logic (no I/O)             │
//! │  ├── variant.rs  - Per-variant configuration tables          │
//! │  ├── score.rs    - Category scoring over dice                │
//! │  ├── scorecard.rs- Cells, preview/commit, derived totals     │
//! │  ├── player.rs   - Identity and seat data                    │
//! │  └── session.rs  - One match, turn state machine             │
//! │                                                              │
//! │  network/        - Routing and wire shapes                   │
//! │  ├── protocol.rs - Actions and snapshots (camelCase JSON)    │
//! │  ├── transport.rs- Outbound delivery seam                    │
//! │  └── registry.rs - Matchmaking, dispatch, finish path        │
//! │                                                              │
//! │  service/        - Fire-and-forget collaborators             │
//! │  ├── move_log.rs - Append-only match event log               │
//! │  └── leaderboard.rs - Per-variant top scores                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Trust Model
//!
//! Clients roll their own dice and compute their own selection scores; the
//! server validates turn order and cell availability, stores what it is
//! given, and keeps every derived total consistent. Sessions are owned by a
//! single [`network::SessionRegistry`] fed one action at a time, so no game
//! state is ever shared across threads.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod game;
pub mod network;
pub mod service;

// Re-export commonly used types
pub use game::{score, GameSession, Player, PlayerId, Scorecard, SessionState, Variant};
pub use network::{GameSnapshot, PlayerAction, ServerMessage, SessionRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
