use crate::use_cases::{ConnectionSet, LobbyRegistry};
use std::sync::Arc;

/// Shared mutable state, constructed once at startup and passed by reference
/// into every connection handler. Scoped to the service instance; there are
/// no process-wide globals.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub registry: Arc<LobbyRegistry>,
    // Live host connections; members exist even before their first post.
    pub host_connections: Arc<ConnectionSet>,
    // Live client connections; these never own registry entries.
    pub client_connections: Arc<ConnectionSet>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
