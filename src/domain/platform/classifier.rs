//! Guesses which platform a raw payload came from.
//!
//! A small naive-Bayes model over top-level keys: each platform has a
//! fingerprint of keys it is expected to send, and every key in the payload
//! either supports or penalises it.

use serde_json::Value;

use crate::domain::foundation::Platform;

const ALEXA_KEYS: &[&str] = &["session", "request", "version"];

const GOOGLE_KEYS: &[&str] = &[
    "user",
    "device",
    "conversation",
    "inputs",
    "surface",
    "isInSandbox",
    "availableSurfaces",
    "responseId",
    "queryResult",
    "originalDetectIntentRequest",
    "session",
];

const CORTANA_KEYS: &[&str] = &[
    "type",
    "id",
    "timestamp",
    "serviceUrl",
    "channelId",
    "from",
    "conversation",
    "recipient",
    "text",
    "textFormat",
];

/// Likelihood weight of a key the platform is not expected to send.
const MISS_WEIGHT: f64 = 0.1;

fn fingerprint(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Alexa => ALEXA_KEYS,
        Platform::Google => GOOGLE_KEYS,
        Platform::Cortana => CORTANA_KEYS,
    }
}

/// Log-likelihood of `keys` under `platform`, including a uniform prior.
pub fn score(platform: Platform, keys: &[&str]) -> f64 {
    let expected = fingerprint(platform);
    let size = expected.len() as f64;
    let prior = (1.0 / Platform::ALL.len() as f64).ln();

    keys.iter().fold(prior, |total, key| {
        let weight = if expected.contains(key) { 1.0 } else { MISS_WEIGHT };
        total + (weight / size).ln()
    })
}

/// Classifies a payload. Never fails: non-objects have no keys and fall to
/// the first declared platform.
pub fn classify(payload: &Value) -> Platform {
    let keys: Vec<&str> = payload
        .as_object()
        .map(|object| object.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut best = Platform::ALL[0];
    let mut best_score = f64::NEG_INFINITY;
    for platform in Platform::ALL {
        let candidate = score(platform, &keys);
        // strictly greater keeps the earlier platform on ties
        if candidate > best_score {
            best = platform;
            best_score = candidate;
        }
    }

    tracing::trace!(platform = %best, keys = keys.len(), "payload classified");
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map};

    #[test]
    fn empty_payload_is_alexa() {
        assert_eq!(classify(&json!({})), Platform::Alexa);
        assert_eq!(classify(&Value::Null), Platform::Alexa);
        assert_eq!(classify(&json!([1, 2, 3])), Platform::Alexa);
    }

    #[test]
    fn alexa_envelope_is_alexa() {
        let payload = json!({ "version": "1.0", "session": {}, "request": {} });
        assert_eq!(classify(&payload), Platform::Alexa);
    }

    #[test]
    fn dialogflow_webhook_is_google() {
        let payload = json!({
            "responseId": "r",
            "session": "projects/p/agent/sessions/s",
            "queryResult": {},
            "originalDetectIntentRequest": {}
        });
        assert_eq!(classify(&payload), Platform::Google);
    }

    #[test]
    fn bot_framework_activity_is_cortana() {
        let payload = json!({
            "type": "message",
            "id": "a",
            "timestamp": "2020-01-01T00:00:00Z",
            "serviceUrl": "https://example.net",
            "channelId": "cortana",
            "from": {},
            "conversation": {},
            "recipient": {},
            "text": "hello",
            "locale": "en-US",
            "channelData": {}
        });
        assert_eq!(classify(&payload), Platform::Cortana);
    }

    proptest! {
        #[test]
        fn classification_is_deterministic(keys in proptest::collection::vec("[a-zA-Z]{1,12}", 0..12)) {
            let payload = Value::Object(
                keys.into_iter().map(|k| (k, Value::Null)).collect::<Map<_, _>>(),
            );
            prop_assert_eq!(classify(&payload), classify(&payload));
        }

        #[test]
        fn alexa_only_keys_never_leave_alexa(mask in 1u8..8) {
            let payload = Value::Object(
                ALEXA_KEYS
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, k)| (k.to_string(), json!({})))
                    .collect::<Map<_, _>>(),
            );
            prop_assert_eq!(classify(&payload), Platform::Alexa);
        }
    }
}
