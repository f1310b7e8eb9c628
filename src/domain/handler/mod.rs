//! Handlers: which application code runs for a (state, action) pair.

mod action;
mod handler;
mod name_set;
mod registry;

pub use action::Action;
pub use handler::Handler;
pub use name_set::{NameSet, ON_ERROR, WILDCARD};
pub use registry::HandlerRegistry;
