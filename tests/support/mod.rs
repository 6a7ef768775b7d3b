// Shared primitives for driving a discovery server instance per test.
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use discovery_server::interface_adapters::protocol::{self, Command};
use discovery_server::interface_adapters::state::AppState;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

// Generous bound for a localhost response; only hit on regressions.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);
// Bound for state-change polling after commands that send no response.
const CONDITION_TIMEOUT: Duration = Duration::from_secs(5);

// Running server plus handles for observing its shared state.
pub struct TestServer {
    pub host_addr: SocketAddr,
    pub client_addr: SocketAddr,
    pub legacy_addr: SocketAddr,
    pub state: Arc<AppState>,
}

// Spawn a fresh server on ephemeral ports so tests never share a registry.
pub async fn spawn_server() -> TestServer {
    // Ephemeral ports avoid collisions between parallel test binaries.
    let host_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind host port");
    let client_listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind client port");
    let legacy_listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind legacy port");

    let host_addr = host_listener.local_addr().expect("host addr");
    let client_addr = client_listener.local_addr().expect("client addr");
    let legacy_addr = legacy_listener.local_addr().expect("legacy addr");

    // Construct state externally so assertions can read it directly.
    let state = Arc::new(AppState::new());
    tokio::spawn(discovery_server::run_with_state(
        host_listener,
        client_listener,
        legacy_listener,
        state.clone(),
    ));

    TestServer {
        host_addr,
        client_addr,
        legacy_addr,
        state,
    }
}

pub async fn connect(addr: SocketAddr) -> TcpStream {
    TcpStream::connect(addr).await.expect("connect to test server")
}

// Write one protocol frame.
pub async fn send_command(stream: &mut TcpStream, command: &Command) {
    stream
        .write_all(protocol::encode(command).as_bytes())
        .await
        .expect("write command frame");
}

// Write one raw text frame, bypassing the codec.
pub async fn send_raw(stream: &mut TcpStream, text: &str) {
    stream
        .write_all(text.as_bytes())
        .await
        .expect("write raw frame");
}

// Read one response frame as text.
pub async fn read_response(stream: &mut TcpStream) -> String {
    let mut buffer = [0u8; 512];
    let read = timeout(RESPONSE_TIMEOUT, stream.read(&mut buffer))
        .await
        .expect("response before timeout")
        .expect("read response frame");
    String::from_utf8_lossy(&buffer[..read]).into_owned()
}

// Read until the server closes the connection; fails on payload bytes.
pub async fn expect_eof(stream: &mut TcpStream) {
    let mut buffer = [0u8; 512];
    let read = timeout(RESPONSE_TIMEOUT, stream.read(&mut buffer))
        .await
        .expect("close before timeout")
        .expect("read after server close");
    assert_eq!(read, 0, "expected server to close without responding");
}

// Give the server time to drain one frame before the next write; used only
// between commands that produce no response to read.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

pub async fn wait_for_host_count(state: &AppState, expected: usize) {
    let deadline = Instant::now() + CONDITION_TIMEOUT;
    while Instant::now() < deadline {
        if state.host_connections.len().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("host connection count never reached {expected}");
}

pub async fn wait_for_client_count(state: &AppState, expected: usize) {
    let deadline = Instant::now() + CONDITION_TIMEOUT;
    while Instant::now() < deadline {
        if state.client_connections.len().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("client connection count never reached {expected}");
}

pub async fn wait_for_lobby_count(state: &AppState, expected: usize) {
    let deadline = Instant::now() + CONDITION_TIMEOUT;
    while Instant::now() < deadline {
        if state.registry.len().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("registry entry count never reached {expected}");
}

// Poll until the single registered lobby reports the given player count;
// used to observe in-place overwrites, which send no response either.
pub async fn wait_for_lobby_players(state: &AppState, expected: u32) {
    let deadline = Instant::now() + CONDITION_TIMEOUT;
    while Instant::now() < deadline {
        let players = state
            .registry
            .values()
            .await
            .first()
            .map(|lobby| lobby.current_players);
        if players == Some(expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("lobby player count never reached {expected}");
}
