// Client surface: lobby browsers querying the registry over TCP.

use crate::frameworks::config::FRAME_BUFFER_SIZE;
use crate::interface_adapters::protocol::{
    self, CORRUPTED_GUID_MARKER, Command, LobbyInfoDto, LobbyKey, LobbyQuery, STATUS_OK_RESPONSE,
    UNKNOWN_COMMAND_RESPONSE,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::LobbyRegistry;

use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Accepts client connections until the listener fails or the future is
/// dropped. Established connections keep running on their own tasks.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await.inspect_err(|e| {
            warn!(error = %e, "client accept failed");
        })?;
        debug!(%peer, "client connection accepted");
        tokio::spawn(handle_connection(socket, state.clone()));
    }
}

async fn handle_connection(mut socket: TcpStream, state: Arc<AppState>) {
    let guid = Uuid::new_v4();
    state.client_connections.add(guid).await;
    info!(%guid, "client connected");

    let mut frame = [0u8; FRAME_BUFFER_SIZE];
    loop {
        let read = match socket.read(&mut frame).await {
            Ok(0) => {
                info!(%guid, "client closed connection");
                break;
            }
            Ok(read) => read,
            Err(e) => {
                warn!(%guid, error = %e, "client read failed");
                break;
            }
        };

        let text = String::from_utf8_lossy(&frame[..read]);

        // Payload problems never drop a client; only transport failures and
        // an explicit Close end this loop.
        let response = match protocol::decode(&text) {
            Some(Command::Close) => {
                info!(%guid, "client sent close");
                break;
            }
            Some(Command::GetStatus) => STATUS_OK_RESPONSE.to_string(),
            Some(Command::GetLobbyGuids) => guids_response(&state.registry).await,
            Some(Command::GetLobbyInfo(query)) => {
                lobby_info_response(&state.registry, &query).await
            }
            Some(Command::PostLobbyInfo(_)) | None => {
                debug!(%guid, "unknown or unsupported client frame");
                UNKNOWN_COMMAND_RESPONSE.to_string()
            }
        };

        if let Err(e) = socket.write_all(response.as_bytes()).await {
            warn!(%guid, error = %e, "client write failed");
            break;
        }
    }

    state.client_connections.remove(&guid).await;
    info!(%guid, "client disconnected");
}

async fn guids_response(registry: &LobbyRegistry) -> String {
    let guids = registry.keys().await;
    match serde_json::to_string(&guids) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "failed to serialize lobby guids");
            "[]".to_string()
        }
    }
}

/// Single identifiers answer with one value; lists answer with a JSON array
/// in request order. Malformed tokens map to the corrupted marker, absent
/// lobbies to `null`.
async fn lobby_info_response(registry: &LobbyRegistry, query: &LobbyQuery) -> String {
    match query {
        LobbyQuery::One(key) => snapshot_value(registry, key).await.to_string(),
        LobbyQuery::Many(keys) => {
            let mut items = Vec::with_capacity(keys.len());
            for key in keys {
                items.push(snapshot_value(registry, key).await);
            }
            Value::Array(items).to_string()
        }
    }
}

async fn snapshot_value(registry: &LobbyRegistry, key: &LobbyKey) -> Value {
    match key {
        LobbyKey::Malformed(raw) => {
            debug!(token = %raw, "malformed lobby guid in request");
            Value::String(CORRUPTED_GUID_MARKER.to_string())
        }
        LobbyKey::Valid(guid) => lookup_value(registry, guid).await,
    }
}

async fn lookup_value(registry: &LobbyRegistry, guid: &Uuid) -> Value {
    let Some(info) = registry.try_get(guid).await else {
        return Value::Null;
    };
    match serde_json::to_value(LobbyInfoDto::from(info)) {
        Ok(value) => value,
        Err(e) => {
            error!(%guid, error = %e, "failed to serialize lobby snapshot");
            Value::Null
        }
    }
}
