// Use cases layer: shared state mutated by the connection handlers.

pub mod connections;
pub mod registry;

pub use connections::ConnectionSet;
pub use registry::LobbyRegistry;
