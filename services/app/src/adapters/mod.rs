pub mod gateway;
pub mod speech;
pub mod store;

pub use gateway::RestGateway;
pub use speech::NullSynthesizer;
pub use store::{FileStore, MemoryStore};
