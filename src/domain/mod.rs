// Domain layer: lobby records published by game servers.

pub mod lobby;

pub use lobby::LobbyInfo;
