//! Parley - Write a voice application once, run it on Alexa, Google and Cortana.
//!
//! Application code registers per-state [`domain::handler::Handler`]s with an
//! [`application::Engine`]. For each inbound payload the engine detects the
//! platform, normalizes the request, runs middleware and the transition loop,
//! and renders the response back into the platform's wire format.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
