//! Dynamic key-value maps carried through a conversation.
//!
//! Session attributes, long-lived user storage and turn-local scratch space
//! are genuinely open-ended, so they stay as JSON maps rather than typed
//! structs.

use serde_json::{Map, Value};

/// An ordered JSON object used for attributes, storage and temp data.
pub type AttributeMap = Map<String, Value>;

/// Reads a string at `pointer`; empty strings count as missing.
pub fn str_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
