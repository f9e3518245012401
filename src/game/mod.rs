//! Game Logic Module
//!
//! Everything that decides scores and turns. No I/O here; the registry
//! drives these types and reports the results.
//!
//! ## Module Structure
//!
//! - `variant`: Static per-variant configuration tables
//! - `score`: Category scoring over a set of dice
//! - `scorecard`: Per-player cells, preview/commit, derived totals
//! - `player`: Player identity and seat data
//! - `session`: One match - seats, dice, turn state machine

pub mod variant;
pub mod score;
pub mod scorecard;
pub mod player;
pub mod session;

// Re-export key types
pub use variant::{BaseVariant, Variant, VariantConfig};
pub use score::{score, Category};
pub use scorecard::{Cell, Scorecard, ScorecardError, EMPTY_CELL};
pub use player::{Player, PlayerId};
pub use session::{GameSession, SessionError, SessionState};
