//! Storage Adapters
//!
//! Implementations of the SessionStore port for persisting user documents.
//!
//! ## Available Adapters
//!
//! - **FileSessionStore** - One YAML file per user on disk
//! - **InMemorySessionStore** - Documents in memory (testing/development)

mod file_session_store;
mod in_memory_session_store;

pub use file_session_store::FileSessionStore;
pub use in_memory_session_store::InMemorySessionStore;
