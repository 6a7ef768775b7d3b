// Framework bootstrap for the discovery service runtime.

use crate::frameworks::config;
use crate::interface_adapters::net::{clients, hosts, legacy};
use crate::interface_adapters::state::AppState;

use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves all three surfaces on the provided listeners with fresh state.
pub async fn run(
    host_listener: TcpListener,
    client_listener: TcpListener,
    legacy_listener: TcpListener,
) -> Result<()> {
    run_with_state(
        host_listener,
        client_listener,
        legacy_listener,
        Arc::new(AppState::new()),
    )
    .await
}

/// Serves on the provided listeners against externally constructed state;
/// integration tests use this to observe the registry directly.
pub async fn run_with_state(
    host_listener: TcpListener,
    client_listener: TcpListener,
    legacy_listener: TcpListener,
    state: Arc<AppState>,
) -> Result<()> {
    tracing::info!(address = %host_listener.local_addr()?, "listening for hosts");
    tracing::info!(address = %client_listener.local_addr()?, "listening for clients");
    tracing::info!(address = %legacy_listener.local_addr()?, "listening for legacy clients");

    // A failed surface stops all three accept loops together; established
    // connections run on their own tasks and drain independently.
    tokio::try_join!(
        hosts::run(host_listener, state.clone()),
        clients::run(client_listener, state.clone()),
        legacy::run(legacy_listener, state),
    )
    .map(|_| ())
    .inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = config::bind_address();
    let host_listener = bind(SocketAddr::from((address, config::host_port()))).await?;
    let client_listener = bind(SocketAddr::from((address, config::client_port()))).await?;
    let legacy_listener = bind(SocketAddr::from((address, config::legacy_port()))).await?;

    run(host_listener, client_listener, legacy_listener).await
}

async fn bind(address: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(address).await.inspect_err(|e| {
        tracing::error!(%address, error = %e, "failed to bind");
    })
}
