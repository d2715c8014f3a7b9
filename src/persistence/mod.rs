// src/persistence/mod.rs
pub mod gateway;
pub mod in_memory;
pub mod json_file;

pub use self::gateway::PersistenceGateway;
pub use self::in_memory::InMemoryStore;
