//! WebSocket-backed device transport.
//!
//! Each device connection gets two bounded outbound queues. Reliable frames
//! keep their order and are never dropped; a device that lets its reliable
//! queue fill up is evicted and its socket closed. Unreliable frames use a
//! small queue and are dropped when it is full.

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{trace, warn};
use trainerd_core::{ConsoleError, Transport};
use trainerd_types::{ConnectionId, SendMode};

struct Peer {
    reliable: mpsc::Sender<String>,
    unreliable: mpsc::Sender<String>,
    evicted: Arc<Notify>,
}

/// Receiving ends of a peer's outbound queues, drained by its socket writer.
pub struct PeerQueues {
    pub reliable: mpsc::Receiver<String>,
    pub unreliable: mpsc::Receiver<String>,
    evicted: Arc<Notify>,
}

impl PeerQueues {
    /// Next frame to write, reliable frames first. `None` once both queues are closed.
    pub async fn next(&mut self) -> Option<String> {
        tokio::select! {
            biased;
            Some(frame) = self.reliable.recv() => Some(frame),
            Some(frame) = self.unreliable.recv() => Some(frame),
            else => None,
        }
    }

    /// Signalled when the transport gives up on this peer.
    pub fn eviction(&self) -> Arc<Notify> {
        self.evicted.clone()
    }
}

/// Live device sockets keyed by connection id.
pub struct WsTransport {
    peers: DashMap<ConnectionId, Peer>,
    next_id: AtomicU64,
    reliable_depth: usize,
    unreliable_depth: usize,
}

impl WsTransport {
    pub fn new(reliable_depth: usize, unreliable_depth: usize) -> Self {
        Self {
            peers: DashMap::new(),
            next_id: AtomicU64::new(1),
            reliable_depth: reliable_depth.max(1),
            unreliable_depth: unreliable_depth.max(1),
        }
    }

    /// Allocate a connection id and its outbound queues.
    pub fn register(&self) -> (ConnectionId, PeerQueues) {
        let connection = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (reliable_tx, reliable_rx) = mpsc::channel(self.reliable_depth);
        let (unreliable_tx, unreliable_rx) = mpsc::channel(self.unreliable_depth);
        let evicted = Arc::new(Notify::new());

        self.peers.insert(
            connection,
            Peer {
                reliable: reliable_tx,
                unreliable: unreliable_tx,
                evicted: evicted.clone(),
            },
        );

        (
            connection,
            PeerQueues {
                reliable: reliable_rx,
                unreliable: unreliable_rx,
                evicted,
            },
        )
    }

    /// Forget a connection; later sends to it fail.
    pub fn unregister(&self, connection: ConnectionId) {
        self.peers.remove(&connection);
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}

impl Transport for WsTransport {
    fn send(&self, connection: ConnectionId, frame: &str, mode: SendMode) -> trainerd_core::Result<()> {
        let peer = self
            .peers
            .get(&connection)
            .ok_or(ConsoleError::SessionNotFound(connection))?;

        match mode {
            SendMode::Reliable => match peer.reliable.try_send(frame.to_string()) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => {
                    warn!(target: "trainerd::ws", "{} fell {} reliable frames behind, disconnecting", connection, self.reliable_depth);
                    peer.evicted.notify_one();
                    Err(ConsoleError::Transport(format!("{} reliable queue full", connection)))
                }
                Err(TrySendError::Closed(_)) => {
                    Err(ConsoleError::Transport(format!("{} writer closed", connection)))
                }
            },
            SendMode::Unreliable => match peer.unreliable.try_send(frame.to_string()) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(frame)) => {
                    trace!(target: "trainerd::ws::drop", "Dropped unreliable frame to {}: {:?}", connection, frame);
                    Ok(())
                }
                Err(TrySendError::Closed(_)) => {
                    Err(ConsoleError::Transport(format!("{} writer closed", connection)))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reliable_frames_keep_order() {
        let transport = WsTransport::new(16, 4);
        let (conn, mut queues) = transport.register();

        for i in 0..10 {
            transport.send(conn, &format!("module{}", i), SendMode::Reliable).unwrap();
        }
        for i in 0..10 {
            assert_eq!(queues.next().await.unwrap(), format!("module{}", i));
        }
    }

    #[tokio::test]
    async fn test_unreliable_overflow_is_dropped() {
        let transport = WsTransport::new(16, 2);
        let (conn, mut queues) = transport.register();

        for _ in 0..5 {
            transport.send(conn, "watch", SendMode::Unreliable).unwrap();
        }
        transport.send(conn, "module1", SendMode::Reliable).unwrap();

        // Reliable frames are written first
        assert_eq!(queues.next().await.unwrap(), "module1");
        assert_eq!(queues.next().await.unwrap(), "watch");
        assert_eq!(queues.next().await.unwrap(), "watch");
        assert!(queues.unreliable.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reliable_overflow_evicts_peer() {
        let transport = WsTransport::new(2, 2);
        let (conn, mut queues) = transport.register();
        let evicted = queues.eviction();

        transport.send(conn, "module1", SendMode::Reliable).unwrap();
        transport.send(conn, "module2", SendMode::Reliable).unwrap();
        assert!(matches!(
            transport.send(conn, "module3", SendMode::Reliable),
            Err(ConsoleError::Transport(_))
        ));

        // The stored permit completes immediately
        tokio::time::timeout(std::time::Duration::from_secs(1), evicted.notified())
            .await
            .unwrap();
        // Frames accepted before the overflow are still in order
        assert_eq!(queues.next().await.unwrap(), "module1");
        assert_eq!(queues.next().await.unwrap(), "module2");
    }

    #[test]
    fn test_send_to_unknown_or_closed_peer() {
        let transport = WsTransport::new(16, 2);
        assert!(matches!(
            transport.send(ConnectionId(99), "next", SendMode::Unreliable),
            Err(ConsoleError::SessionNotFound(ConnectionId(99)))
        ));

        let (conn, queues) = transport.register();
        drop(queues);
        assert!(matches!(
            transport.send(conn, "module1", SendMode::Reliable),
            Err(ConsoleError::Transport(_))
        ));

        transport.unregister(conn);
        assert_eq!(transport.peer_count(), 0);
    }

    #[test]
    fn test_connection_ids_are_unique() {
        let transport = WsTransport::new(1, 1);
        let (a, _qa) = transport.register();
        let (b, _qb) = transport.register();
        assert_ne!(a, b);
        assert_eq!(transport.peer_count(), 2);
    }
}
