// Liveness tracking for accepted connections, one set per handler kind.

use std::collections::HashSet;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Set of identifiers for currently-alive connections.
///
/// Membership is independent of registry membership: a host connection is
/// tracked here from accept until close even if it never posts a lobby.
/// The lock is held only across the single mutation or read.
#[derive(Debug, Default)]
pub struct ConnectionSet {
    connections: Mutex<HashSet<Uuid>>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashSet::new()),
        }
    }

    pub async fn add(&self, guid: Uuid) {
        let mut connections = self.connections.lock().await;
        connections.insert(guid);
    }

    pub async fn remove(&self, guid: &Uuid) -> bool {
        let mut connections = self.connections.lock().await;
        connections.remove(guid)
    }

    pub async fn contains(&self, guid: &Uuid) -> bool {
        let connections = self.connections.lock().await;
        connections.contains(guid)
    }

    pub async fn len(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
