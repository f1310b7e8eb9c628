//! Alexa Skills Kit request/response codec.

use serde_json::{json, Map, Value};

use crate::domain::foundation::{str_at, Platform, SessionDocument};
use crate::domain::request::Slot;
use crate::domain::response::{
    speak_envelope, AudioBehavior, AudioCommand, AudioOptions, Card, Directive,
    NormalizedResponse,
};

use super::{RequestAdapter, ResponseAdapter};

const INTENT_REQUEST: &str = "IntentRequest";

/// Codec for Alexa custom-skill envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlexaCodec;

impl RequestAdapter for AlexaCodec {
    fn platform(&self) -> Platform {
        Platform::Alexa
    }

    fn user_id(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/session/user/userId")
    }

    fn session_id(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/session/sessionId")
    }

    fn is_new_session(&self, payload: &Value) -> bool {
        payload
            .pointer("/session/new")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn locale(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/request/locale")
    }

    fn action(&self, payload: &Value) -> Option<String> {
        let request_type = str_at(payload, "/request/type");
        if request_type.as_deref() == Some(INTENT_REQUEST) {
            return str_at(payload, "/request/intent/name");
        }
        request_type
    }

    fn session_document(&self, payload: &Value) -> Option<SessionDocument> {
        payload
            .pointer("/session/attributes")
            .filter(|v| v.is_object())
            .map(SessionDocument::from_value)
    }

    fn request_id(&self, payload: &Value) -> Option<String> {
        str_at(payload, "/request/requestId")
    }

    fn slots(&self, payload: &Value) -> Vec<Slot> {
        payload
            .pointer("/request/intent/slots")
            .and_then(Value::as_object)
            .map(|slots| {
                slots
                    .iter()
                    .map(|(name, slot)| Slot::from_value(name.clone(), slot))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ResponseAdapter for AlexaCodec {
    fn platform(&self) -> Platform {
        Platform::Alexa
    }

    fn render(&self, response: &NormalizedResponse) -> Value {
        let mut body = Map::new();
        body.insert("shouldEndSession".into(), json!(response.should_end_session));

        if let Some(ssml) = speak_envelope(&response.spoken_lines()) {
            body.insert("outputSpeech".into(), ssml_speech(ssml));
        }
        if let Some(ssml) = speak_envelope(&response.reprompt_lines()) {
            body.insert("reprompt".into(), json!({ "outputSpeech": ssml_speech(ssml) }));
        }

        let mut directives = Vec::new();
        for directive in &response.directives {
            match directive {
                // one card per response; the last one written wins
                Directive::Card(card) => {
                    body.insert("card".into(), render_card(card));
                }
                Directive::Audio(options) => directives.push(render_audio(options)),
            }
        }
        if !directives.is_empty() {
            body.insert("directives".into(), Value::Array(directives));
        }

        json!({
            "version": "1.0",
            "sessionAttributes": response.session_document().to_value(),
            "response": Value::Object(body),
        })
    }
}

fn ssml_speech(ssml: String) -> Value {
    json!({ "type": "SSML", "ssml": ssml })
}

fn render_card(card: &Card) -> Value {
    let title = card.title.clone().unwrap_or_default();
    let text = card.text.clone().unwrap_or_default();

    if !card.has_image() {
        return json!({ "type": "Simple", "title": title, "content": text });
    }

    let mut image = Map::new();
    if let Some(url) = &card.small_image_url {
        image.insert("smallImageUrl".into(), json!(url));
    }
    if let Some(url) = &card.large_image_url {
        image.insert("largeImageUrl".into(), json!(url));
    }
    json!({ "type": "Standard", "title": title, "text": text, "image": image })
}

fn render_audio(options: &AudioOptions) -> Value {
    match options.command {
        AudioCommand::Stop => json!({ "type": "AudioPlayer.Stop" }),
        AudioCommand::Clear => {
            let behavior = match options.behavior {
                Some(AudioBehavior::ClearEnqueued) => "CLEAR_ENQUEUED",
                _ => "CLEAR_ALL",
            };
            json!({ "type": "AudioPlayer.ClearQueue", "clearBehavior": behavior })
        }
        AudioCommand::Play => {
            let behavior = match options.behavior {
                Some(AudioBehavior::Enqueue) => "ENQUEUE",
                Some(AudioBehavior::ReplaceEnqueued) => "REPLACE_ENQUEUED",
                _ => "REPLACE_ALL",
            };
            let mut stream = Map::new();
            stream.insert("url".into(), json!(options.url.clone().unwrap_or_default()));
            stream.insert(
                "token".into(),
                json!(options.token.clone().or_else(|| options.url.clone()).unwrap_or_default()),
            );
            stream.insert("offsetInMilliseconds".into(), json!(options.offset_ms));
            if let Some(previous) = &options.expected_previous_token {
                stream.insert("expectedPreviousToken".into(), json!(previous));
            }
            json!({
                "type": "AudioPlayer.Play",
                "playBehavior": behavior,
                "audioItem": { "stream": stream },
            })
        }
    }
}
