/// Live lobby metadata exclusively owned by one host connection.
///
/// The registry stores these by connection identifier; readers only ever
/// receive cloned snapshots, never a reference to the live record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyInfo {
    pub name: String,
    pub current_players: u32,
    pub max_players: u32,
    // Game port advertised to joining players, once the host knows it.
    pub port: Option<u16>,
    pub status: String,
}
