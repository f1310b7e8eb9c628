//! Alexa slot values.

use serde::Serialize;
use serde_json::Value;

const SUCCESS_MATCH: &str = "ER_SUCCESS_MATCH";

/// A slot filled by the user's utterance.
///
/// Prefers the value an entity-resolution authority matched strictly (the
/// canonical catalogue name) and falls back to the literal spoken words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub name: String,
    pub literal: Option<String>,
    pub strict: Option<String>,
    pub id: Option<String>,
}

impl Slot {
    /// Reads a slot object leniently; unexpected shapes leave fields empty.
    pub fn from_value(name: impl Into<String>, slot: &Value) -> Self {
        let literal = slot
            .get("value")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let matched = slot
            .pointer("/resolutions/resolutionsPerAuthority")
            .and_then(Value::as_array)
            .and_then(|authorities| {
                authorities.iter().find(|authority| {
                    authority.pointer("/status/code").and_then(Value::as_str)
                        == Some(SUCCESS_MATCH)
                })
            })
            .and_then(|authority| authority.pointer("/values/0/value"));

        Self {
            name: name.into(),
            literal,
            strict: matched
                .and_then(|v| v.get("name"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            id: matched
                .and_then(|v| v.get("id"))
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }

    /// The resolved value: strict match first, then the spoken literal.
    pub fn value(&self) -> Option<&str> {
        self.strict.as_deref().or(self.literal.as_deref())
    }

    /// Compares the resolved value with `other`; an empty slot equals `""`.
    pub fn is(&self, other: &str) -> bool {
        self.value().unwrap_or_default() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_strict_resolution_over_literal() {
        let slot = Slot::from_value(
            "color",
            &json!({
                "name": "color",
                "value": "reddish",
                "resolutions": { "resolutionsPerAuthority": [
                    { "status": { "code": "ER_SUCCESS_NO_MATCH" } },
                    { "status": { "code": "ER_SUCCESS_MATCH" },
                      "values": [{ "value": { "name": "red", "id": "RED" } }] }
                ]}
            }),
        );
        assert_eq!(slot.value(), Some("red"));
        assert_eq!(slot.id.as_deref(), Some("RED"));
        assert!(slot.is("red"));
    }

    #[test]
    fn falls_back_to_literal() {
        let slot = Slot::from_value("city", &json!({ "value": "paris" }));
        assert_eq!(slot.value(), Some("paris"));
        assert_eq!(slot.strict, None);
    }

    #[test]
    fn empty_slot_has_no_value() {
        let slot = Slot::from_value("city", &json!("garbage"));
        assert_eq!(slot.value(), None);
        assert!(slot.is(""));
    }
}
