//! Outbound Transport
//!
//! Seam between the registry and whatever actually moves bytes. The registry
//! addresses messages by [`PlayerId`]; a transport implementation owns the
//! mapping from identity to connection. Delivery is fire-and-forget: a dead
//! connection is logged and skipped, never surfaced as a registry error.

use std::collections::BTreeMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::game::player::PlayerId;
use crate::network::protocol::ServerMessage;

/// Delivers messages to connected clients. Implementations must not block.
pub trait Transport: Send + Sync {
    /// Deliver one message to one identity. Best effort.
    fn send(&self, to: &PlayerId, message: &ServerMessage);

    /// Deliver one message to every connected identity. Best effort.
    fn broadcast(&self, message: &ServerMessage);
}

/// Channel-backed transport: one unbounded queue per connected identity.
///
/// The accept loop registers a connection and drains the returned receiver
/// into its socket; the registry stays unaware of sockets entirely.
#[derive(Debug, Default)]
pub struct ChannelTransport {
    channels: Mutex<BTreeMap<PlayerId, mpsc::UnboundedSender<ServerMessage>>>,
}

impl ChannelTransport {
    /// Create a transport with no connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an identity and get the receiving end of its queue.
    ///
    /// Reconnecting under the same identity replaces the old queue; the
    /// previous receiver sees the channel close.
    pub fn register(&self, id: PlayerId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut channels) = self.channels.lock() {
            if channels.insert(id, tx).is_some() {
                debug!(player_id = %id, "replaced existing transport channel");
            }
        }
        rx
    }

    /// Detach an identity. Pending messages in its queue are dropped.
    pub fn unregister(&self, id: &PlayerId) {
        if let Ok(mut channels) = self.channels.lock() {
            channels.remove(id);
        }
    }

    /// Number of attached identities.
    pub fn connection_count(&self) -> usize {
        self.channels.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, to: &PlayerId, message: &ServerMessage) {
        let Ok(channels) = self.channels.lock() else {
            return;
        };
        match channels.get(to) {
            Some(tx) => {
                if tx.send(message.clone()).is_err() {
                    warn!(player_id = %to, "transport channel closed, message dropped");
                }
            }
            None => {
                debug!(player_id = %to, "no transport channel, message dropped");
            }
        }
    }

    fn broadcast(&self, message: &ServerMessage) {
        let Ok(channels) = self.channels.lock() else {
            return;
        };
        for (id, tx) in channels.iter() {
            if tx.send(message.clone()).is_err() {
                warn!(player_id = %id, "transport channel closed, broadcast dropped");
            }
        }
    }
}
