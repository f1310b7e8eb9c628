//! Domain layer: the platform-neutral model of a conversational turn.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (platform tag, attribute maps, waypoints, documents, errors)
//! - `platform` - Payload classification and the Alexa/Google/Cortana codecs
//! - `request` / `response` - Normalized request view and the response being built
//! - `speech` - Speech trees, assembly and markup repair
//! - `handler` - Per-state handlers and action resolution
//! - `context` - The per-turn session context application code writes through

pub mod context;
pub mod foundation;
pub mod handler;
pub mod platform;
pub mod request;
pub mod response;
pub mod speech;
