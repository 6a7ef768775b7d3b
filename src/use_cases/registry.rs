// Lobby registry shared between the host and client surfaces.

use crate::domain::LobbyInfo;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe store of live lobby records keyed by host connection id.
///
/// Exactly one host connection ever owns a given key, so writes to the same
/// key are never concurrent; the lock serializes structural changes. Every
/// operation holds the lock only for its own duration.
#[derive(Debug, Default)]
pub struct LobbyRegistry {
    lobbies: RwLock<HashMap<Uuid, LobbyInfo>>,
}

impl LobbyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            lobbies: RwLock::new(HashMap::new()),
        }
    }

    /// Creates the entry on a host's first post, overwrites it afterwards.
    pub async fn upsert(&self, guid: Uuid, info: LobbyInfo) {
        let mut lobbies = self.lobbies.write().await;
        lobbies.insert(guid, info);
    }

    /// Removes the entry for a terminated host connection.
    pub async fn remove(&self, guid: &Uuid) -> bool {
        let mut lobbies = self.lobbies.write().await;
        lobbies.remove(guid).is_some()
    }

    /// Returns a snapshot of the record under `guid`, if present.
    pub async fn try_get(&self, guid: &Uuid) -> Option<LobbyInfo> {
        let lobbies = self.lobbies.read().await;
        lobbies.get(guid).cloned()
    }

    /// Point-in-time copy of all registered identifiers.
    pub async fn keys(&self) -> Vec<Uuid> {
        let lobbies = self.lobbies.read().await;
        lobbies.keys().copied().collect()
    }

    /// Point-in-time copy of all records.
    pub async fn values(&self) -> Vec<LobbyInfo> {
        let lobbies = self.lobbies.read().await;
        lobbies.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        let lobbies = self.lobbies.read().await;
        lobbies.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every entry; used on service teardown.
    pub async fn clear(&self) {
        let mut lobbies = self.lobbies.write().await;
        lobbies.clear();
    }
}
