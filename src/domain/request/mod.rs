//! Normalized request model.

mod normalized_request;
mod slot;

pub use normalized_request::{NormalizedRequest, UserProfile};
pub use slot::Slot;
