//! HTTP adapters - Webhook host for the turn engine.

pub mod turn;

// Re-export key types for convenience
pub use turn::turn_router;
pub use turn::TurnAppState;
