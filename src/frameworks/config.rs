use std::{env, net::IpAddr};

// Runtime/server constants and environment-backed settings.

/// One TCP read is one protocol frame; larger frames are out of contract.
pub const FRAME_BUFFER_SIZE: usize = 512;

pub fn host_port() -> u16 {
    env::var("DISCOVERY_HOST_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(47920)
}

pub fn client_port() -> u16 {
    env::var("DISCOVERY_CLIENT_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(47921)
}

pub fn legacy_port() -> u16 {
    env::var("DISCOVERY_LEGACY_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(47922)
}

pub fn bind_address() -> IpAddr {
    env::var("DISCOVERY_BIND_ADDRESS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| IpAddr::from([0, 0, 0, 0]))
}
