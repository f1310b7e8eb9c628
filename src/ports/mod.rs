//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `Middleware` - Steps run before and after handler dispatch
//! - `SessionStore` - Per-user persistence between sessions
//! - `RequestVerifier` - Authenticity checks for inbound payloads

mod middleware;
mod request_verifier;
mod session_store;

pub use middleware::{Middleware, SharedContext};
pub use request_verifier::{
    RequestVerifier, SignatureMaterial, VerificationError, CERT_CHAIN_HEADER, SIGNATURE_HEADER,
};
pub use session_store::{SessionStore, SessionStoreError};
