//! Boundary to the device transport.

use crate::Result;
use trainerd_types::{ConnectionId, SendMode};

/// Event delivered by the transport.
///
/// Transports run their own I/O tasks and never touch session state; they only
/// push these events into the console queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected(ConnectionId),
    Disconnected(ConnectionId),
    Frame { connection: ConnectionId, data: String },
}

/// Outbound side of the device transport.
///
/// Sends are fire-and-forget: returning `Ok` means the frame was handed to the
/// connection's queue, not that the device received it.
pub trait Transport: Send + Sync {
    fn send(&self, connection: ConnectionId, frame: &str, mode: SendMode) -> Result<()>;
}
