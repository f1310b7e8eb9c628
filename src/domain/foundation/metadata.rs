//! Side-channel data a transport hands over alongside the payload.

use std::collections::HashMap;

/// Transport metadata for one turn: headers and the raw request body.
///
/// Header names are stored lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct TurnMetadata {
    headers: HashMap<String, String>,
    raw_body: Option<Vec<u8>>,
}

impl TurnMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn with_raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    pub fn insert_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The request body exactly as received, when the transport kept it.
    pub fn raw_body(&self) -> Option<&[u8]> {
        self.raw_body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let meta = TurnMetadata::new().with_header("Signature", "abc");
        assert_eq!(meta.header("signature"), Some("abc"));
        assert_eq!(meta.header("SIGNATURE"), Some("abc"));
        assert_eq!(meta.header("other"), None);
    }

    #[test]
    fn raw_body_round_trips() {
        let meta = TurnMetadata::new().with_raw_body(b"{}".to_vec());
        assert_eq!(meta.raw_body(), Some(&b"{}"[..]));
    }
}
