//! Normalized response model and directives.

mod directive;
mod normalized_response;

pub use directive::{AudioBehavior, AudioCommand, AudioOptions, AudioSpec, Card, Directive};
pub use normalized_response::{
    speak_envelope, NormalizedResponse, STATUS_BAD_REQUEST, STATUS_OK,
};
