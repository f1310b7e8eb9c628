//! The platform-neutral response built during a turn.

use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{AttributeMap, Platform, SessionDocument, WaypointStack};
use crate::domain::platform::response_adapter;

use super::Directive;

/// HTTP status a transport should reply with by default.
pub const STATUS_OK: u16 = 200;
/// Status set when a request fails verification.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// What the application wants to say and do, independent of platform.
///
/// Written to through `SessionContext` during the turn, then rendered once by
/// [`NormalizedResponse::output`] into the platform's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResponse {
    pub platform: Platform,
    pub session_id: Option<String>,
    pub speech: Vec<String>,
    pub prompts: Vec<String>,
    pub reprompts: Vec<String>,
    pub directives: Vec<Directive>,
    pub waypoints: WaypointStack,
    pub should_end_session: bool,
    pub state: Option<String>,
    pub action: Option<String>,
    pub attributes: AttributeMap,
    pub status_code: u16,
}

impl NormalizedResponse {
    /// Creates an empty response that ends the session.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            session_id: None,
            speech: Vec::new(),
            prompts: Vec::new(),
            reprompts: Vec::new(),
            directives: Vec::new(),
            waypoints: WaypointStack::new(),
            should_end_session: true,
            state: None,
            action: None,
            attributes: AttributeMap::new(),
            status_code: STATUS_OK,
        }
    }

    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// The state to carry into the next request of this session.
    pub fn session_document(&self) -> SessionDocument {
        SessionDocument {
            state: self.state.clone(),
            attributes: self.attributes.clone(),
            waypoints: self.waypoints.clone(),
        }
    }

    /// Fragments spoken in the main envelope: speech, plus prompts while the
    /// session stays open.
    pub fn spoken_lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.speech.iter().map(String::as_str).collect();
        if !self.should_end_session {
            lines.extend(self.prompts.iter().map(String::as_str));
        }
        lines
    }

    /// Fragments for the reprompt envelope; empty when the session ends.
    pub fn reprompt_lines(&self) -> Vec<&str> {
        if self.should_end_session {
            return Vec::new();
        }
        self.reprompts.iter().map(String::as_str).collect()
    }

    /// Renders the platform-specific response body.
    pub fn output(&self) -> Value {
        response_adapter(self.platform).render(self)
    }

    /// Pretty-printed JSON of [`NormalizedResponse::output`].
    pub fn json(&self) -> String {
        serde_json::to_string_pretty(&self.output()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Wraps lines in a `<speak>` envelope, or `None` when there is nothing to say.
pub fn speak_envelope(lines: &[&str]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    Some(format!("<speak>{}</speak>", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_response_ends_session_and_is_empty() {
        let response = NormalizedResponse::new(Platform::Alexa);
        assert!(response.should_end_session);
        assert!(response.speech.is_empty());
        assert_eq!(response.status_code, STATUS_OK);
    }

    #[test]
    fn prompts_are_spoken_only_while_session_continues() {
        let mut response = NormalizedResponse::new(Platform::Alexa);
        response.speech.push("a".into());
        response.prompts.push("b?".into());
        response.reprompts.push("c?".into());

        assert_eq!(response.spoken_lines(), vec!["a"]);
        assert!(response.reprompt_lines().is_empty());

        response.should_end_session = false;
        assert_eq!(response.spoken_lines(), vec!["a", "b?"]);
        assert_eq!(response.reprompt_lines(), vec!["c?"]);
    }

    #[test]
    fn envelope_is_omitted_for_no_lines() {
        assert_eq!(speak_envelope(&[]), None);
        assert_eq!(
            speak_envelope(&["a", "b"]),
            Some("<speak>a\nb</speak>".to_string())
        );
    }
}
