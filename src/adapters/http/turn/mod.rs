//! HTTP adapter for the turn engine.

mod dto;
mod handlers;
mod routes;

pub use dto::ErrorResponse;
pub use handlers::{health, perform_turn, TurnAppState};
pub use routes::turn_router;
