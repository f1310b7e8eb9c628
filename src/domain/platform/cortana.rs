//! Cortana codec: Bot Framework activities.

use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::domain::foundation::{str_at, Platform, SessionDocument};
use crate::domain::request::UserProfile;
use crate::domain::response::{speak_envelope, Directive, NormalizedResponse};
use crate::domain::speech::markup::strip_tags;

use super::{RequestAdapter, ResponseAdapter};

const HERO_CARD: &str = "application/vnd.microsoft.card.hero";

/// Codec for Bot Framework message activities.
#[derive(Debug, Clone, Copy, Default)]
pub struct CortanaCodec;

impl RequestAdapter for CortanaCodec {
    fn platform(&self) -> Platform {
        Platform::Cortana
    }

    fn user_id(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/from/id")
    }

    fn session_id(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/conversation/id")
    }

    /// Bot Framework has no session flag; a turn is new until a reply has
    /// carried a session document back.
    fn is_new_session(&self, payload: &Value) -> bool {
        self.session_document(payload).is_none()
    }

    fn locale(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/locale")
    }

    fn action(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/type")
    }

    fn session_document(&self, payload: &Value) -> Option<SessionDocument> {
        payload
            .pointer("/channelData/sessionAttributes")
            .filter(|v| v.is_object())
            .map(SessionDocument::from_value)
    }

    fn request_id(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/id")
    }

    fn query_text(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/text")
    }

    fn user_profile(&self, payload: &Value) -> UserProfile {
        UserProfile {
            display_name: str_at(payload, "/from/name"),
            ..UserProfile::default()
        }
    }
}

impl ResponseAdapter for CortanaCodec {
    fn platform(&self) -> Platform {
        Platform::Cortana
    }

    fn render(&self, response: &NormalizedResponse) -> Value {
        let mut activity = Map::new();
        activity.insert("type".into(), json!("message"));
        activity.insert("id".into(), json!(Uuid::new_v4().to_string()));
        activity.insert("timestamp".into(), json!(Utc::now().to_rfc3339()));
        if let Some(session) = &response.session_id {
            activity.insert("conversation".into(), json!({ "id": session }));
        }

        if let Some(ssml) = speak_envelope(&response.spoken_lines()) {
            activity.insert("text".into(), json!(strip_tags(&ssml)));
            activity.insert("speak".into(), json!(ssml));
        }

        let hint = if response.should_end_session {
            "acceptingInput"
        } else {
            "expectingInput"
        };
        activity.insert("inputHint".into(), json!(hint));

        let attachments: Vec<Value> = response
            .directives
            .iter()
            .filter_map(|directive| match directive {
                Directive::Card(card) => {
                    let images: Vec<Value> = card
                        .large_image_url
                        .iter()
                        .chain(card.small_image_url.iter())
                        .take(1)
                        .map(|url| json!({ "url": url }))
                        .collect();
                    Some(json!({
                        "contentType": HERO_CARD,
                        "content": {
                            "title": card.title.clone().unwrap_or_default(),
                            "text": card.text.clone().unwrap_or_default(),
                            "images": images,
                        }
                    }))
                }
                Directive::Audio(_) => None,
            })
            .collect();
        if !attachments.is_empty() {
            activity.insert("attachments".into(), Value::Array(attachments));
        }

        let mut channel_data = Map::new();
        channel_data.insert(
            "sessionAttributes".into(),
            response.session_document().to_value(),
        );
        if let Some(reprompt) = speak_envelope(&response.reprompt_lines()) {
            channel_data.insert("reprompt".into(), json!(reprompt));
        }
        activity.insert("channelData".into(), Value::Object(channel_data));

        Value::Object(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::response::Card;

    fn activity(channel_data: Value) -> Value {
        json!({
            "type": "message",
            "id": "act-1",
            "timestamp": "2020-01-01T00:00:00Z",
            "serviceUrl": "https://example.net",
            "channelId": "cortana",
            "from": { "id": "user-1", "name": "Grace" },
            "conversation": { "id": "conv-1" },
            "recipient": { "id": "bot" },
            "text": "open demo",
            "locale": "en-AU",
            "channelData": channel_data
        })
    }

    #[test]
    fn first_activity_is_a_new_session() {
        let request = CortanaCodec.normalize(activity(json!({})), None);
        assert!(request.is_new_session());
        assert_eq!(request.user_id(), Some("user-1"));
        assert_eq!(request.session_id(), Some("conv-1"));
        assert_eq!(request.locale(), "en-AU");
        assert_eq!(request.action(), Some("message"));
        assert_eq!(request.query_text(), Some("open demo"));
        assert_eq!(request.user_profile().display_name.as_deref(), Some("Grace"));
    }

    #[test]
    fn carried_session_document_is_restored() {
        let payload = activity(json!({
            "sessionAttributes": { "STATE": "quiz", "ATTRIBUTES": { "n": 1 } }
        }));
        let request = CortanaCodec.normalize(payload, None);
        assert!(!request.is_new_session());
        assert_eq!(request.state(), Some("quiz"));
        assert_eq!(request.attributes().get("n"), Some(&json!(1)));
    }

    #[test]
    fn renders_reply_activity() {
        let mut response =
            NormalizedResponse::new(Platform::Cortana).with_session_id(Some("conv-1".into()));
        response.should_end_session = false;
        response.speech.push("Hi.".into());
        response.reprompts.push("Well?".into());
        response
            .directives
            .push(Directive::Card(Card::new("T", "B").with_image("https://s", "https://l")));

        let output = CortanaCodec.render(&response);
        assert_eq!(output["type"], json!("message"));
        assert_eq!(output["text"], json!("Hi."));
        assert_eq!(output["speak"], json!("<speak>Hi.</speak>"));
        assert_eq!(output["inputHint"], json!("expectingInput"));
        assert_eq!(output["conversation"]["id"], json!("conv-1"));
        assert_eq!(output["attachments"][0]["contentType"], json!(HERO_CARD));
        assert_eq!(
            output["attachments"][0]["content"]["images"][0]["url"],
            json!("https://l")
        );
        assert_eq!(output["channelData"]["reprompt"], json!("<speak>Well?</speak>"));
        assert!(output["channelData"]["sessionAttributes"].is_object());
    }

    #[test]
    fn finished_session_accepts_input_without_speech() {
        let output = CortanaCodec.render(&NormalizedResponse::new(Platform::Cortana));
        assert_eq!(output["inputHint"], json!("acceptingInput"));
        assert!(output.get("speak").is_none());
        assert!(output.get("text").is_none());
    }
}
