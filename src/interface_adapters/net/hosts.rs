// Host surface: game servers publishing lobby state over TCP.

use crate::frameworks::config::FRAME_BUFFER_SIZE;
use crate::interface_adapters::protocol::{self, Command, LobbyPayload, STATUS_OK_RESPONSE};
use crate::interface_adapters::state::AppState;

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

enum LoopControl {
    Continue,
    Disconnect,
}

/// Accepts host connections until the listener fails or the future is
/// dropped. Established connections keep running on their own tasks.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await.inspect_err(|e| {
            warn!(error = %e, "host accept failed");
        })?;
        debug!(%peer, "host connection accepted");
        tokio::spawn(handle_connection(socket, state.clone()));
    }
}

async fn handle_connection(mut socket: TcpStream, state: Arc<AppState>) {
    // The identifier doubles as the registry key once the host posts.
    let guid = Uuid::new_v4();
    state.host_connections.add(guid).await;
    info!(%guid, "host connected");

    let mut frame = [0u8; FRAME_BUFFER_SIZE];
    loop {
        let read = match socket.read(&mut frame).await {
            Ok(0) => {
                info!(%guid, "host closed connection");
                break;
            }
            Ok(read) => read,
            Err(e) => {
                warn!(%guid, error = %e, "host read failed");
                break;
            }
        };

        let text = String::from_utf8_lossy(&frame[..read]);
        match dispatch(&mut socket, guid, &state, &text).await {
            LoopControl::Continue => {}
            LoopControl::Disconnect => break,
        }
    }

    // Single cleanup path: graceful close, transport failures, and schema
    // violations all land here exactly once.
    state.registry.remove(&guid).await;
    state.host_connections.remove(&guid).await;
    info!(%guid, "host disconnected");
}

async fn dispatch(
    socket: &mut TcpStream,
    guid: Uuid,
    state: &AppState,
    text: &str,
) -> LoopControl {
    match protocol::decode(text) {
        Some(Command::Close) => LoopControl::Disconnect,
        Some(Command::GetStatus) => {
            if let Err(e) = socket.write_all(STATUS_OK_RESPONSE.as_bytes()).await {
                warn!(%guid, error = %e, "failed to send status response");
                return LoopControl::Disconnect;
            }
            LoopControl::Continue
        }
        Some(Command::PostLobbyInfo(LobbyPayload::Valid(dto))) => {
            debug!(%guid, lobby = %dto.name, "lobby info posted");
            state.registry.upsert(guid, dto.into()).await;
            LoopControl::Continue
        }
        Some(Command::PostLobbyInfo(LobbyPayload::Invalid)) => {
            // A host that cannot produce its own schema is a broken peer;
            // drop it without a response, this surface has no error channel.
            warn!(%guid, "schema-invalid lobby info; dropping host");
            LoopControl::Disconnect
        }
        Some(Command::GetLobbyInfo(_)) | Some(Command::GetLobbyGuids) | None => {
            // Query commands and frame noise are tolerated silently.
            debug!(%guid, "ignoring frame unsupported on the host surface");
            LoopControl::Continue
        }
    }
}
