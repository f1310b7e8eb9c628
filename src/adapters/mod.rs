//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external systems:
//! - `storage` - Session stores (in-memory, YAML files)
//! - `verification` - Request signature verification
//! - `middleware` - Ready-made middleware (built-in action aliases)
//! - `http` - axum webhook host

pub mod http;
pub mod middleware;
pub mod storage;
pub mod verification;

pub use middleware::BuiltInActions;
pub use storage::{FileSessionStore, InMemorySessionStore};
pub use verification::{HmacSha256Verifier, VerificationMiddleware};
