//! Declarative speech specifications.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Reserved key: pick one element at random.
pub const RANDOM: &str = "random";
/// Reserved key: timed silence, e.g. `"2s"`.
pub const PAUSE: &str = "pause";
/// Reserved key: prosodic break with a strength, e.g. `"strong"`.
pub const BREAK: &str = "break";
/// Reserved key: play an audio clip from a URL.
pub const AUDIO: &str = "audio";

/// A tree describing what to say.
///
/// Keyed entries keep their insertion order; each key is either a locale tag
/// (`"en-US"`) or one of the reserved directives [`RANDOM`], [`PAUSE`],
/// [`BREAK`] and [`AUDIO`].
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechNode {
    Text(String),
    Number(Number),
    Sequence(Vec<SpeechNode>),
    Keyed(Vec<(String, SpeechNode)>),
}

impl SpeechNode {
    /// Builds a keyed node from `(key, node)` pairs.
    pub fn keyed<K, N, I>(entries: I) -> Self
    where
        K: Into<String>,
        N: Into<SpeechNode>,
        I: IntoIterator<Item = (K, N)>,
    {
        SpeechNode::Keyed(
            entries
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        )
    }

    /// Speech spoken only when the request locale matches.
    pub fn localized(locale: impl Into<String>, node: impl Into<SpeechNode>) -> Self {
        SpeechNode::Keyed(vec![(locale.into(), node.into())])
    }

    /// One of `choices`, picked uniformly per assembly.
    pub fn random<N: Into<SpeechNode>>(choices: impl IntoIterator<Item = N>) -> Self {
        SpeechNode::Keyed(vec![(
            RANDOM.to_string(),
            SpeechNode::Sequence(choices.into_iter().map(Into::into).collect()),
        )])
    }

    pub fn pause(duration: impl Into<String>) -> Self {
        SpeechNode::Keyed(vec![(PAUSE.to_string(), SpeechNode::Text(duration.into()))])
    }

    pub fn pause_strength(strength: impl Into<String>) -> Self {
        SpeechNode::Keyed(vec![(BREAK.to_string(), SpeechNode::Text(strength.into()))])
    }

    pub fn audio(url: impl Into<String>) -> Self {
        SpeechNode::Keyed(vec![(AUDIO.to_string(), SpeechNode::Text(url.into()))])
    }

    /// Empty text, zero, and empty containers produce no speech.
    pub fn is_falsy(&self) -> bool {
        match self {
            SpeechNode::Text(s) => s.is_empty(),
            SpeechNode::Number(n) => n.as_f64().map_or(true, |f| f == 0.0),
            SpeechNode::Sequence(items) => items.is_empty(),
            SpeechNode::Keyed(entries) => entries.is_empty(),
        }
    }

    /// The literal value of a text or number node.
    pub fn literal(&self) -> Option<String> {
        match self {
            SpeechNode::Text(s) => Some(s.clone()),
            SpeechNode::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for SpeechNode {
    fn from(s: &str) -> Self {
        SpeechNode::Text(s.to_string())
    }
}

impl From<String> for SpeechNode {
    fn from(s: String) -> Self {
        SpeechNode::Text(s)
    }
}

impl From<&String> for SpeechNode {
    fn from(s: &String) -> Self {
        SpeechNode::Text(s.clone())
    }
}

impl From<i64> for SpeechNode {
    fn from(n: i64) -> Self {
        SpeechNode::Number(n.into())
    }
}

impl From<i32> for SpeechNode {
    fn from(n: i32) -> Self {
        SpeechNode::Number(i64::from(n).into())
    }
}

impl From<u64> for SpeechNode {
    fn from(n: u64) -> Self {
        SpeechNode::Number(n.into())
    }
}

impl From<f64> for SpeechNode {
    fn from(n: f64) -> Self {
        Number::from_f64(n)
            .map(SpeechNode::Number)
            .unwrap_or_else(|| SpeechNode::Text(String::new()))
    }
}

impl<N: Into<SpeechNode>> From<Vec<N>> for SpeechNode {
    fn from(items: Vec<N>) -> Self {
        SpeechNode::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<&Value> for SpeechNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => SpeechNode::Text(s.clone()),
            Value::Number(n) => SpeechNode::Number(n.clone()),
            Value::Array(items) => SpeechNode::Sequence(items.iter().map(Into::into).collect()),
            Value::Object(map) => SpeechNode::Keyed(
                map.iter()
                    .map(|(k, v)| (k.clone(), SpeechNode::from(v)))
                    .collect(),
            ),
            Value::Null | Value::Bool(_) => SpeechNode::Sequence(Vec::new()),
        }
    }
}

impl From<Value> for SpeechNode {
    fn from(value: Value) -> Self {
        SpeechNode::from(&value)
    }
}

impl<'de> Deserialize<'de> for SpeechNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SpeechNode::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_objects_keep_key_order() {
        let node = SpeechNode::from(json!({ "pause": "1s", "en-US": "hi", "audio": "u" }));
        match node {
            SpeechNode::Keyed(entries) => {
                let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["pause", "en-US", "audio"]);
            }
            other => panic!("expected keyed node, got {:?}", other),
        }
    }

    #[test]
    fn null_and_bool_become_empty_speech() {
        assert!(SpeechNode::from(json!(null)).is_falsy());
        assert!(SpeechNode::from(json!(true)).is_falsy());
    }

    #[test]
    fn zero_and_empty_text_are_falsy() {
        assert!(SpeechNode::from(0).is_falsy());
        assert!(SpeechNode::from("").is_falsy());
        assert!(!SpeechNode::from(7).is_falsy());
        assert!(!SpeechNode::from("hi").is_falsy());
    }

    #[test]
    fn numbers_render_without_trailing_zeroes() {
        assert_eq!(SpeechNode::from(42).literal(), Some("42".to_string()));
        assert_eq!(SpeechNode::from(1.5).literal(), Some("1.5".to_string()));
    }

    #[test]
    fn deserializes_from_json_text() {
        let node: SpeechNode = serde_json::from_str(r#"["a", {"random": ["b", "c"]}]"#).unwrap();
        assert!(matches!(node, SpeechNode::Sequence(ref items) if items.len() == 2));
    }
}
