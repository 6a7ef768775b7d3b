// Legacy ASCII query surface kept for older lobby browsers: index-based
// lookups over the same registry, one plain-text command per read.

use crate::frameworks::config::FRAME_BUFFER_SIZE;
use crate::interface_adapters::protocol::LobbyInfoDto;
use crate::interface_adapters::state::AppState;

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

const GET_COUNT_COMMAND: &str = "get-count";
const GET_INFO_COMMAND: &str = "get-info";
const CLOSE_COMMAND: &str = "close";

pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await.inspect_err(|e| {
            warn!(error = %e, "legacy accept failed");
        })?;
        debug!(%peer, "legacy connection accepted");
        tokio::spawn(handle_connection(socket, state.clone()));
    }
}

async fn handle_connection(mut socket: TcpStream, state: Arc<AppState>) {
    info!("legacy client connected");

    let mut frame = [0u8; FRAME_BUFFER_SIZE];
    loop {
        let read = match socket.read(&mut frame).await {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) => {
                warn!(error = %e, "legacy read failed");
                break;
            }
        };

        // Older browsers send upper- and mixed-case commands.
        let command = String::from_utf8_lossy(&frame[..read]).trim().to_lowercase();

        match command.as_str() {
            CLOSE_COMMAND => break,
            GET_COUNT_COMMAND => {
                let count = state.registry.len().await.to_string();
                debug!(count = %count, "sending lobby count");
                if let Err(e) = socket.write_all(count.as_bytes()).await {
                    warn!(error = %e, "legacy write failed");
                    break;
                }
            }
            command if command.starts_with(GET_INFO_COMMAND) => {
                // Bad or out-of-range indexes end the session; that is the
                // behavior older browsers already rely on.
                let Some(json) = info_response(&state, command).await else {
                    break;
                };
                if let Err(e) = socket.write_all(json.as_bytes()).await {
                    warn!(error = %e, "legacy write failed");
                    break;
                }
            }
            other => {
                debug!(command = %other, "unknown legacy command");
            }
        }
    }

    info!("legacy client disconnected");
}

/// Resolves `get-info <index>` against a fresh values() snapshot.
async fn info_response(state: &AppState, command: &str) -> Option<String> {
    let raw_index = command.strip_prefix(GET_INFO_COMMAND)?.trim();
    let Ok(index) = raw_index.parse::<usize>() else {
        warn!(token = %raw_index, "unparsable legacy lobby index");
        return None;
    };

    let lobbies = state.registry.values().await;
    let Some(info) = lobbies.into_iter().nth(index) else {
        warn!(index, "legacy lobby index out of range");
        return None;
    };

    match serde_json::to_string(&LobbyInfoDto::from(info)) {
        Ok(json) => Some(json),
        Err(e) => {
            error!(error = %e, "failed to serialize legacy lobby info");
            None
        }
    }
}
