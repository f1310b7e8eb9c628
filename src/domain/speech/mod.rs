//! Speech assembly.
//!
//! Application code describes what to say as a [`SpeechNode`] tree: plain
//! text, sequences, per-locale alternatives, random choices, pauses and audio
//! clips. [`SpeechAssembler`] resolves the tree for the request locale into
//! markup fragments that a response adapter wraps in a `<speak>` envelope.

mod assembler;
pub mod markup;
mod node;

pub use assembler::{SharedSpeechTransform, SpeechAssembler, SpeechTransform};
pub use node::{SpeechNode, AUDIO, BREAK, PAUSE, RANDOM};
