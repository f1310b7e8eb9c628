//! Application layer - Orchestrates a turn across the domain and ports.

mod engine;
mod errors;

pub use engine::Engine;
pub use errors::{TurnError, TurnFailure};
