//! Per-turn state and the authoring API application code writes through.

use serde_json::Value;

use crate::domain::foundation::{
    AttributeMap, SessionDocument, TurnMetadata, UserDocument, Waypoint, WaypointStack,
};
use crate::domain::platform;
use crate::domain::request::NormalizedRequest;
use crate::domain::response::{AudioSpec, Card, Directive, NormalizedResponse};
use crate::domain::speech::{SharedSpeechTransform, SpeechAssembler, SpeechNode};

/// Everything one turn reads and writes.
///
/// Owns the normalized request (read-only) and the response being built.
/// `storage` survives across sessions through a session store; `temp` lives
/// for this turn only and is never persisted or emitted.
pub struct SessionContext {
    request: NormalizedRequest,
    response: NormalizedResponse,
    storage: AttributeMap,
    temp: AttributeMap,
    metadata: TurnMetadata,
    restored_session: Option<SessionDocument>,
    transform: Option<SharedSpeechTransform>,
    errors: Vec<String>,
    aborted: bool,
    will_transition: bool,
}

impl SessionContext {
    /// Builds a context whose response starts from the request's carried-over
    /// state, action, attributes and waypoints.
    pub fn new(request: NormalizedRequest, metadata: TurnMetadata) -> Self {
        let mut response = NormalizedResponse::new(request.platform())
            .with_session_id(request.session_id().map(str::to_owned));
        response.state = request.state().map(str::to_owned);
        response.action = request.action().map(str::to_owned);
        response.attributes = request.attributes().clone();
        response.waypoints = request.waypoints().clone();

        Self {
            request,
            response,
            storage: AttributeMap::new(),
            temp: AttributeMap::new(),
            metadata,
            restored_session: None,
            transform: None,
            errors: Vec::new(),
            aborted: false,
            will_transition: false,
        }
    }

    /// Classifies and normalizes a raw payload, then builds the context.
    pub fn from_payload(payload: Value, metadata: TurnMetadata, default_locale: Option<&str>) -> Self {
        Self::new(platform::normalize(payload, default_locale), metadata)
    }

    pub fn with_transform(mut self, transform: Option<SharedSpeechTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub(crate) fn set_transform(&mut self, transform: Option<SharedSpeechTransform>) {
        self.transform = transform;
    }

    pub fn request(&self) -> &NormalizedRequest {
        &self.request
    }

    pub fn response(&self) -> &NormalizedResponse {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut NormalizedResponse {
        &mut self.response
    }

    pub fn into_response(self) -> NormalizedResponse {
        self.response
    }

    pub fn locale(&self) -> &str {
        self.request.locale()
    }

    pub fn metadata(&self) -> &TurnMetadata {
        &self.metadata
    }

    // ---- speech -------------------------------------------------------

    fn assemble(&self, spec: SpeechNode) -> Vec<String> {
        SpeechAssembler::new(self.request.locale())
            .with_transform(self.transform.as_deref())
            .assemble(&spec)
    }

    /// Appends speech.
    pub fn say(&mut self, spec: impl Into<SpeechNode>) -> &mut Self {
        let fragments = self.assemble(spec.into());
        self.response.speech.extend(fragments);
        self
    }

    /// Appends a prompt and keeps the session open for the answer.
    pub fn ask(&mut self, spec: impl Into<SpeechNode>) -> &mut Self {
        let fragments = self.assemble(spec.into());
        self.response.prompts.extend(fragments);
        self.response.should_end_session = false;
        self
    }

    /// Appends what to say when the user does not answer.
    pub fn reprompt(&mut self, spec: impl Into<SpeechNode>) -> &mut Self {
        let fragments = self.assemble(spec.into());
        self.response.reprompts.extend(fragments);
        self
    }

    pub fn end_session(&mut self, end: bool) -> &mut Self {
        self.response.should_end_session = end;
        self
    }

    // ---- directives ---------------------------------------------------

    pub fn card(&mut self, card: Card) -> &mut Self {
        self.response.directives.push(Directive::Card(card));
        self
    }

    /// Controls audio playback: `"stop"`, `"clear enqueued"`, `"clear all"`
    /// (or `"clear"`), any other string as a URL to play, or full options.
    pub fn audio(&mut self, spec: impl Into<AudioSpec>) -> &mut Self {
        self.response
            .directives
            .push(Directive::Audio(spec.into().into_options()));
        self
    }

    // ---- transitions --------------------------------------------------

    pub fn state(&self) -> Option<&str> {
        self.response.state.as_deref()
    }

    pub fn action(&self) -> Option<&str> {
        self.response.action.as_deref()
    }

    pub fn set_state(&mut self, state: Option<String>) {
        self.response.state = state;
        self.will_transition = true;
    }

    pub fn set_action(&mut self, action: Option<String>) {
        self.response.action = action;
        self.will_transition = true;
    }

    /// Moves to `action` in `state`; the engine runs it within this turn.
    pub fn transition_to(&mut self, state: impl Into<String>, action: impl Into<String>) -> &mut Self {
        self.set_state(Some(state.into()));
        self.set_action(Some(action.into()));
        self
    }

    pub fn transition_to_state(&mut self, state: impl Into<String>) -> &mut Self {
        self.set_state(Some(state.into()));
        self
    }

    pub fn transition_to_action(&mut self, action: impl Into<String>) -> &mut Self {
        self.set_action(Some(action.into()));
        self
    }

    /// Requests another pass of the transition loop without changing
    /// state or action.
    pub fn force_transition(&mut self) {
        self.will_transition = true;
    }

    /// Whether state or action changed since the last checkpoint.
    pub fn will_transition(&self) -> bool {
        self.will_transition
    }

    /// Checkpoint: clears the transition flag.
    pub fn clean(&mut self) {
        self.will_transition = false;
    }

    // ---- waypoints ----------------------------------------------------

    pub fn waypoints(&self) -> &WaypointStack {
        &self.response.waypoints
    }

    /// Saves the current (state, action) to return to later.
    pub fn add_waypoint(&mut self) -> &mut Self {
        let here = Waypoint::new(self.response.state.clone(), self.response.action.clone());
        self.response.waypoints.push(here);
        self
    }

    pub fn push_waypoint(&mut self, waypoint: Waypoint) -> &mut Self {
        self.response.waypoints.push(waypoint);
        self
    }

    /// Pops the most recent waypoint and transitions to it. Does nothing
    /// when the stack is empty.
    pub fn yield_waypoint(&mut self) -> Option<Waypoint> {
        let waypoint = self.response.waypoints.pop()?;
        self.set_state(waypoint.state.clone());
        self.set_action(waypoint.action.clone());
        Some(waypoint)
    }

    pub fn clear_waypoints(&mut self) -> &mut Self {
        self.response.waypoints.clear();
        self
    }

    // ---- attributes and storage ---------------------------------------

    /// Session attribute, carried to the next turn of this session.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.response.attributes.get(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.response.attributes.insert(name.into(), value.into());
        self
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        self.response.attributes.remove(name)
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.response.attributes
    }

    /// Per-user data that outlives sessions.
    pub fn storage(&self) -> &AttributeMap {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut AttributeMap {
        &mut self.storage
    }

    /// Scratch space for this turn.
    pub fn temp(&self) -> &AttributeMap {
        &self.temp
    }

    pub fn temp_mut(&mut self) -> &mut AttributeMap {
        &mut self.temp
    }

    /// The interrupted session loaded from the store at the start of this
    /// turn, if there was one.
    pub fn restored_session(&self) -> Option<&SessionDocument> {
        self.restored_session.as_ref()
    }

    /// Loads persisted user data into the context.
    pub(crate) fn restore(&mut self, document: UserDocument) {
        self.storage = document.storage;
        if let Some(session) = document.session.filter(|s| !s.is_empty()) {
            self.response.state = session.state.clone();
            self.response.attributes = session.attributes.clone();
            self.response.waypoints = session.waypoints.clone();
            self.restored_session = Some(session);
        }
    }

    /// What a session store should keep for this user.
    pub(crate) fn user_document(&self, include_session: bool) -> UserDocument {
        UserDocument {
            session: include_session.then(|| self.response.session_document()),
            storage: self.storage.clone(),
        }
    }

    // ---- control ------------------------------------------------------

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub(crate) fn record_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Stops the turn: no further actions or middleware run.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn status_code(&self) -> u16 {
        self.response.status_code
    }

    pub fn set_status_code(&mut self, status: u16) {
        self.response.status_code = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Platform;
    use crate::domain::response::{AudioBehavior, AudioCommand, AudioOptions};
    use serde_json::json;
    use std::sync::Arc;

    fn context(locale: &str) -> SessionContext {
        let payload = json!({
            "version": "1.0",
            "session": {
                "new": false,
                "sessionId": "s-1",
                "user": { "userId": "u-1" },
                "attributes": { "STATE": "menu", "ATTRIBUTES": { "visits": 1 } }
            },
            "request": { "type": "IntentRequest", "locale": locale, "intent": { "name": "Go" } }
        });
        SessionContext::from_payload(payload, TurnMetadata::new(), None)
    }

    #[test]
    fn response_starts_from_request_state() {
        let ctx = context("en-US");
        assert_eq!(ctx.request().platform(), Platform::Alexa);
        assert_eq!(ctx.state(), Some("menu"));
        assert_eq!(ctx.action(), Some("Go"));
        assert_eq!(ctx.attr("visits"), Some(&json!(1)));
        assert_eq!(ctx.response().session_id.as_deref(), Some("s-1"));
        assert!(!ctx.will_transition());
    }

    #[test]
    fn ask_keeps_session_open() {
        let mut ctx = context("en-US");
        assert!(ctx.response().should_end_session);
        ctx.say("Welcome.").ask("Ready?").reprompt("Hello?");

        assert!(!ctx.response().should_end_session);
        assert_eq!(ctx.response().speech, vec!["Welcome."]);
        assert_eq!(ctx.response().prompts, vec!["Ready?"]);
        assert_eq!(ctx.response().reprompts, vec!["Hello?"]);
    }

    #[test]
    fn speech_uses_request_locale() {
        let mut ctx = context("de-DE");
        ctx.say(SpeechNode::keyed([("en-US", "hi"), ("de-DE", "hallo")]));
        assert_eq!(ctx.response().speech, vec!["hallo"]);
    }

    #[test]
    fn transform_hook_runs_on_literals() {
        let hook: SharedSpeechTransform = Arc::new(|text: &str, _: &str| text.to_uppercase());
        let mut ctx = context("en-US").with_transform(Some(hook));
        ctx.say("quiet");
        assert_eq!(ctx.response().speech, vec!["QUIET"]);
    }

    #[test]
    fn any_state_or_action_write_sets_transition_flag() {
        let mut ctx = context("en-US");
        ctx.transition_to_action("Next");
        assert!(ctx.will_transition());

        ctx.clean();
        assert!(!ctx.will_transition());

        ctx.transition_to_state("quiz");
        assert!(ctx.will_transition());
        assert_eq!(ctx.state(), Some("quiz"));

        ctx.clean();
        ctx.force_transition();
        assert!(ctx.will_transition());
    }

    #[test]
    fn waypoints_are_lifo() {
        let mut ctx = context("en-US");
        ctx.push_waypoint(Waypoint::at("s1", "a1"));
        ctx.push_waypoint(Waypoint::at("s2", "a2"));

        assert_eq!(ctx.yield_waypoint(), Some(Waypoint::at("s2", "a2")));
        assert_eq!((ctx.state(), ctx.action()), (Some("s2"), Some("a2")));

        assert_eq!(ctx.yield_waypoint(), Some(Waypoint::at("s1", "a1")));
        assert_eq!((ctx.state(), ctx.action()), (Some("s1"), Some("a1")));

        ctx.clean();
        assert_eq!(ctx.yield_waypoint(), None);
        assert_eq!((ctx.state(), ctx.action()), (Some("s1"), Some("a1")));
        assert!(!ctx.will_transition());
    }

    #[test]
    fn add_waypoint_saves_current_position() {
        let mut ctx = context("en-US");
        ctx.add_waypoint();
        assert_eq!(ctx.waypoints().peek(), Some(&Waypoint::at("menu", "Go")));
    }

    #[test]
    fn audio_strings_map_to_commands() {
        let mut ctx = context("en-US");
        ctx.audio("https://example.net/a.mp3")
            .audio("stop")
            .audio("clear enqueued")
            .audio(AudioOptions {
                url: Some("https://example.net/b.mp3".into()),
                offset_ms: 500,
                ..Default::default()
            });

        let commands: Vec<_> = ctx
            .response()
            .directives
            .iter()
            .map(|d| match d {
                Directive::Audio(options) => (options.command, options.behavior),
                Directive::Card(_) => panic!("unexpected card"),
            })
            .collect();
        assert_eq!(
            commands,
            vec![
                (AudioCommand::Play, Some(AudioBehavior::ReplaceAll)),
                (AudioCommand::Stop, None),
                (AudioCommand::Clear, Some(AudioBehavior::ClearEnqueued)),
                (AudioCommand::Play, Some(AudioBehavior::ReplaceAll)),
            ]
        );
    }

    #[test]
    fn restore_loads_storage_and_session() {
        let mut ctx = context("en-US");
        let mut document = UserDocument::default();
        document.storage.insert("plays".into(), json!(7));
        document.session = Some(SessionDocument {
            state: Some("quiz".into()),
            attributes: [("score".to_string(), json!(3))].into_iter().collect(),
            waypoints: WaypointStack::new(),
        });

        ctx.restore(document);
        assert_eq!(ctx.storage().get("plays"), Some(&json!(7)));
        assert_eq!(ctx.state(), Some("quiz"));
        assert_eq!(ctx.attr("score"), Some(&json!(3)));
        assert!(ctx.restored_session().is_some());
        assert!(!ctx.will_transition());
    }

    #[test]
    fn user_document_includes_session_on_request() {
        let mut ctx = context("en-US");
        ctx.storage_mut().insert("k".into(), json!("v"));
        ctx.temp_mut().insert("scratch".into(), json!(true));

        let without = ctx.user_document(false);
        assert!(without.session.is_none());
        assert_eq!(without.storage.get("k"), Some(&json!("v")));
        assert!(without.storage.get("scratch").is_none());

        let with = ctx.user_document(true);
        assert_eq!(with.session.unwrap().state.as_deref(), Some("menu"));
    }
}
