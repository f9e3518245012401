//! Side Services
//!
//! Fire-and-forget collaborators the registry notifies as play proceeds:
//! move logging for replay/audit and the per-variant top-score board.
//! Registry flow never blocks on these and never fails because of them.

pub mod leaderboard;
pub mod move_log;
