//! Registry of connected device sessions.

use crate::{ConsoleError, Presentation, Result, Session};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};
use trainerd_types::{ConnectionId, SlotId};

/// Sessions in connection order, indexed by connection and by slot.
///
/// Not synchronized: owned by the console actor, which is the only place
/// sessions are created, destroyed or looked up.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<u64, Session>,
    by_connection: HashMap<ConnectionId, u64>,
    by_slot: HashMap<SlotId, u64>,
    next_seq: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for a newly connected device.
    ///
    /// The presentation layer is only asked for a slot once the connection is
    /// known to be new.
    pub fn create_session<P>(&mut self, connection: ConnectionId, presentation: &mut P) -> Result<&Session>
    where
        P: Presentation + ?Sized,
    {
        if self.by_connection.contains_key(&connection) {
            warn!(target: "trainerd::session", "Rejected duplicate session for {}", connection);
            return Err(ConsoleError::SessionAlreadyExists(connection));
        }

        let slot = presentation.on_session_created(connection);
        let seq = self.next_seq;
        self.next_seq += 1;

        if let Some(stale) = self.by_slot.insert(slot, seq) {
            // Presentation handed out a slot that is still bound; the newer
            // session wins the slot lookup.
            warn!(target: "trainerd::session", "{} reassigned while still bound (seq {})", slot, stale);
        }
        self.by_connection.insert(connection, seq);
        self.sessions.insert(seq, Session::new(connection, slot));

        info!(target: "trainerd::session", "Session created for {} in {}", connection, slot);
        Ok(&self.sessions[&seq])
    }

    /// Remove the session of a disconnected device and release its slot.
    pub fn destroy_session<P>(&mut self, connection: ConnectionId, presentation: &mut P) -> Result<Session>
    where
        P: Presentation + ?Sized,
    {
        let Some(seq) = self.by_connection.remove(&connection) else {
            warn!(target: "trainerd::session", "Session not found for {} on destroy", connection);
            return Err(ConsoleError::SessionNotFound(connection));
        };

        let session = self
            .sessions
            .remove(&seq)
            .ok_or(ConsoleError::SessionNotFound(connection))?;
        if self.by_slot.get(&session.slot) == Some(&seq) {
            self.by_slot.remove(&session.slot);
        }
        presentation.on_session_destroyed(session.slot);

        info!(target: "trainerd::session", "Session destroyed for {} ({})", connection, session.slot);
        Ok(session)
    }

    pub fn find(&self, connection: ConnectionId) -> Option<&Session> {
        self.by_connection
            .get(&connection)
            .and_then(|seq| self.sessions.get(seq))
    }

    pub fn find_mut(&mut self, connection: ConnectionId) -> Option<&mut Session> {
        let seq = self.by_connection.get(&connection)?;
        self.sessions.get_mut(seq)
    }

    pub fn find_by_slot(&self, slot: SlotId) -> Option<&Session> {
        self.by_slot.get(&slot).and_then(|seq| self.sessions.get(seq))
    }

    pub fn find_by_slot_mut(&mut self, slot: SlotId) -> Option<&mut Session> {
        let seq = self.by_slot.get(&slot)?;
        self.sessions.get_mut(seq)
    }

    /// Owned snapshot of every session, in connection order.
    pub fn all(&self) -> Vec<Session> {
        self.sessions.values().cloned().collect()
    }

    /// Snapshot of every live connection, in connection order.
    pub fn connections(&self) -> Vec<ConnectionId> {
        self.sessions.values().map(|s| s.connection).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub(crate) fn log_state(&self) {
        debug!(target: "trainerd::session", "{} live sessions", self.sessions.len());
    }
}
