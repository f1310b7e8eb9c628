//! Google Assistant codec: Dialogflow v2 webhooks wrapping Actions on Google
//! conversation payloads.

use serde_json::{json, Map, Value};

use crate::domain::foundation::{str_at, Platform, SessionDocument};
use crate::domain::request::UserProfile;
use crate::domain::response::{speak_envelope, Directive, NormalizedResponse};
use crate::domain::speech::markup::strip_tags;

use super::{RequestAdapter, ResponseAdapter};

/// Suffix of the output context that carries the session document.
const SESSION_CONTEXT: &str = "/contexts/sessionattributes";

/// How many turns Dialogflow keeps the session context alive.
const SESSION_CONTEXT_LIFESPAN: u64 = 10_000;

/// Codec for Dialogflow v2 fulfillment requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleCodec;

/// The Actions on Google conversation payload: Dialogflow nests it under
/// `originalDetectIntentRequest`, a direct conversation webhook sends it as
/// the root.
fn conversation(payload: &Value) -> &Value {
    let non_empty = |v: &&Value| v.as_object().is_some_and(|o| !o.is_empty());

    payload
        .pointer("/originalDetectIntentRequest/payload")
        .filter(non_empty)
        .or_else(|| {
            payload
                .pointer("/originalDetectIntentRequest")
                .filter(non_empty)
        })
        .unwrap_or(payload)
}

impl RequestAdapter for GoogleCodec {
    fn platform(&self) -> Platform {
        Platform::Google
    }

    fn user_id(&self, payload: &Value) -> Option<String> {
        let base = conversation(payload);
        str_at(base, "/user/userId").or_else(|| str_at(base, "/user/user_id"))
    }

    fn session_id(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/session")
            .or_else(|| str_at(conversation(payload), "/conversation/conversationId"))
    }

    fn is_new_session(&self, payload: &Value) -> bool {
        str_at(conversation(payload), "/conversation/type").as_deref() == Some("NEW")
    }

    fn locale(&self, payload: &Value) -> Option<String> {
        str_at(conversation(payload), "/user/locale")
            .or_else(|| str_at(payload, "/queryResult/languageCode"))
    }

    fn action(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/queryResult/intent/displayName")
            .or_else(|| str_at(conversation(payload), "/inputs/0/intent"))
    }

    fn session_document(&self, payload: &Value) -> Option<SessionDocument> {
        let contexts = payload
            .pointer("/queryResult/outputContexts")
            .and_then(Value::as_array)?;

        let context = contexts.iter().find(|context| {
            context
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(SESSION_CONTEXT))
        })?;

        match context.pointer("/parameters/sessionAttributes")? {
            Value::String(encoded) => serde_json::from_str::<Value>(encoded)
                .ok()
                .map(|decoded| SessionDocument::from_value(&decoded)),
            object @ Value::Object(_) => Some(SessionDocument::from_value(object)),
            _ => None,
        }
    }

    fn request_id(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/responseId")
    }

    fn query_text(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/queryResult/queryText")
            .or_else(|| str_at(conversation(payload), "/inputs/0/rawInputs/0/query"))
    }

    fn user_profile(&self, payload: &Value) -> UserProfile {
        let base = conversation(payload);
        UserProfile {
            given_name: str_at(base, "/user/profile/givenName"),
            family_name: str_at(base, "/user/profile/familyName"),
            display_name: str_at(base, "/user/profile/displayName"),
        }
    }
}

impl ResponseAdapter for GoogleCodec {
    fn platform(&self) -> Platform {
        Platform::Google
    }

    fn render(&self, response: &NormalizedResponse) -> Value {
        let speech = speak_envelope(&response.spoken_lines());

        let mut items = Vec::new();
        if let Some(ssml) = &speech {
            items.push(json!({
                "simpleResponse": { "ssml": ssml, "displayText": strip_tags(ssml) }
            }));
        }
        // Actions on Google shows at most one basic card
        if let Some(card) = response.directives.iter().rev().find_map(|d| match d {
            Directive::Card(card) => Some(card),
            Directive::Audio(_) => None,
        }) {
            let mut basic = Map::new();
            if let Some(title) = &card.title {
                basic.insert("title".into(), json!(title));
            }
            if let Some(text) = &card.text {
                basic.insert("formattedText".into(), json!(text));
            }
            if let Some(url) = card.large_image_url.as_ref().or(card.small_image_url.as_ref()) {
                basic.insert(
                    "image".into(),
                    json!({ "url": url, "accessibilityText": card.title.clone().unwrap_or_default() }),
                );
            }
            items.push(json!({ "basicCard": basic }));
        }

        let mut google = Map::new();
        google.insert("expectUserResponse".into(), json!(!response.should_end_session));
        google.insert("richResponse".into(), json!({ "items": items }));

        if let Some(reprompt) = speak_envelope(&response.reprompt_lines()) {
            google.insert("noInputPrompts".into(), json!([{ "ssml": reprompt }]));
        }

        let mut output = Map::new();
        if let Some(ssml) = &speech {
            output.insert("fulfillmentText".into(), json!(strip_tags(ssml)));
        }
        output.insert("payload".into(), json!({ "google": google }));

        let mut contexts = Vec::new();
        if let Some(session) = &response.session_id {
            let encoded = serde_json::to_string(&response.session_document().to_value())
                .unwrap_or_else(|_| "{}".to_string());
            contexts.push(json!({
                "name": format!("{}{}", session, SESSION_CONTEXT),
                "lifespanCount": SESSION_CONTEXT_LIFESPAN,
                "parameters": { "sessionAttributes": encoded },
            }));
        }
        output.insert("outputContexts".into(), Value::Array(contexts));

        Value::Object(output)
    }
}
