//! Foundation module - Shared domain primitives.
//!
//! Contains the platform tag, dynamic attribute maps, waypoints, the
//! documents that carry state between turns, and error types.

mod attributes;
mod documents;
mod errors;
mod metadata;
mod platform;
mod waypoint;

pub use attributes::{str_at, AttributeMap};
pub use documents::{SessionDocument, UserDocument};
pub use errors::{HandlerError, ValidationError};
pub use metadata::TurnMetadata;
pub use platform::Platform;
pub use waypoint::{Waypoint, WaypointStack};
