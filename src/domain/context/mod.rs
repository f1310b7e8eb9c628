//! The per-turn session context.

mod session_context;

pub use session_context::SessionContext;
