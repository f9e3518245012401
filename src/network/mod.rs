//! Network Layer
//!
//! Wire protocol, outbound transport seam, and the session registry that
//! routes every inbound action. This layer holds no game rules - scoring
//! and turn legality live in `game/`.

pub mod protocol;
pub mod registry;
pub mod transport;

pub use protocol::{
    GameSnapshot, LobbyList, PlayerAction, PlayerSnapshot, ServerMessage, SnapshotAction,
};
pub use registry::{RegistryError, SessionRegistry};
pub use transport::{ChannelTransport, Transport};
