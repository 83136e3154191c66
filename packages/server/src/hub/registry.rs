//! Membership set of the hub.
//!
//! Plain synchronous data structure. It is only ever touched from inside the
//! hub's coordination loop, which is what keeps it free of locks.

use std::collections::HashMap;

use super::connection::{ConnectionId, EnqueueError, Outbound, Payload};

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Number of connections that accepted the payload
    pub delivered: usize,
    /// Connections dropped from the set during this broadcast
    pub evicted: Vec<(ConnectionId, EnqueueError)>,
}

/// Active connections keyed by identity
#[derive(Default)]
pub struct Registry {
    connections: HashMap<ConnectionId, Box<dyn Outbound>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection.
    ///
    /// Returns `false` when the connection is already closed or its identity
    /// is already present. A closed connection is released again; a
    /// duplicate is the very connection already registered, so it is dropped
    /// without closing and the existing entry keeps receiving.
    pub fn register(&mut self, conn: Box<dyn Outbound>) -> bool {
        let id = conn.id();
        if conn.is_closed() {
            conn.close();
            return false;
        }
        if self.connections.contains_key(&id) {
            return false;
        }
        self.connections.insert(id, conn);
        true
    }

    /// Remove a connection and release it. Absent ids are a no-op.
    pub fn unregister(&mut self, id: &ConnectionId) -> bool {
        match self.connections.remove(id) {
            Some(conn) => {
                conn.close();
                true
            }
            None => false,
        }
    }

    /// Offer the payload to every member without blocking.
    ///
    /// A member that cannot take it (full buffer or gone) is removed and
    /// released; the others are unaffected.
    pub fn broadcast(&mut self, payload: &Payload) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for (id, conn) in &self.connections {
            match conn.try_enqueue(payload.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => report.evicted.push((*id, e)),
            }
        }

        for (id, _) in &report.evicted {
            self.unregister(id);
        }

        report
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn ids(&self) -> Vec<ConnectionId> {
        self.connections.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        for conn in self.connections.values() {
            conn.close();
        }
    }
}
