//! Per-state behavior: an ordered list of (names, action) entries.

use std::fmt;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::context::SessionContext;
use crate::domain::foundation::HandlerError;

use super::action::FnAction;
use super::{Action, NameSet};

/// The actions available while the conversation is in one state.
///
/// Entries are tried in declaration order; the first entry containing the
/// action wins, so mixins appended later never shadow the handler's own
/// entries.
#[derive(Clone, Default)]
pub struct Handler {
    state: Option<String>,
    entries: Vec<(NameSet, Arc<dyn Action>)>,
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("state", &self.state)
            .field(
                "entries",
                &self.entries.iter().map(|(names, _)| names).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Handler {
    /// Handler for a named state. An empty name is the default handler.
    pub fn new(state: impl Into<String>) -> Self {
        let state = state.into();
        Self {
            state: (!state.is_empty()).then_some(state),
            entries: Vec::new(),
        }
    }

    /// Handler that runs when the conversation has no state.
    pub fn default_state() -> Self {
        Self::default()
    }

    /// Adds a synchronous action.
    pub fn on<F>(self, names: impl Into<NameSet>, action: F) -> Self
    where
        F: Fn(&mut SessionContext, &EngineConfig) -> Result<(), HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.on_action(names, FnAction(action))
    }

    /// Adds an action implementing [`Action`], typically one that awaits I/O.
    pub fn on_action(mut self, names: impl Into<NameSet>, action: impl Action + 'static) -> Self {
        let action: Arc<dyn Action> = Arc::new(action);
        self.entries.push((names.into(), action));
        self
    }

    /// Appends `other`'s entries after this handler's own.
    pub fn mixin(mut self, other: &Handler) -> Self {
        self.entries.extend(other.entries.iter().cloned());
        self
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether some entry names `action` explicitly (the wildcard does not
    /// count).
    pub fn declares(&self, action: &str) -> bool {
        self.entries.iter().any(|(names, _)| names.contains(action))
    }

    /// Picks the action to run for `candidates`, earlier candidates first.
    ///
    /// The first candidate that any entry contains selects the first entry
    /// containing it; otherwise the wildcard entry, otherwise nothing.
    pub fn resolve(&self, candidates: &[&str]) -> Option<&dyn Action> {
        let matched = candidates.iter().find_map(|candidate| {
            self.entries
                .iter()
                .find(|(names, _)| names.contains(candidate))
        });

        matched
            .or_else(|| self.entries.iter().find(|(names, _)| names.is_wildcard()))
            .map(|(_, action)| action.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TurnMetadata;
    use crate::domain::platform::normalize;
    use serde_json::json;

    fn marker(
        tag: &'static str,
    ) -> impl Fn(&mut SessionContext, &EngineConfig) -> Result<(), HandlerError> {
        move |ctx: &mut SessionContext, _: &EngineConfig| {
            ctx.set_attr("ran", tag);
            Ok(())
        }
    }

    async fn ran(handler: &Handler, candidates: &[&str]) -> Option<String> {
        let action = handler.resolve(candidates)?;
        let mut ctx = SessionContext::new(normalize(json!({}), None), TurnMetadata::new());
        action.run(&mut ctx, &EngineConfig::default()).await.unwrap();
        ctx.attr("ran").and_then(|v| v.as_str()).map(str::to_owned)
    }

    #[tokio::test]
    async fn first_matching_candidate_beats_wildcard() {
        let handler = Handler::new("menu")
            .on("A,B", marker("ab"))
            .on("?", marker("wild"));

        assert_eq!(ran(&handler, &["C", "A"]).await.as_deref(), Some("ab"));
        assert_eq!(ran(&handler, &["Z"]).await.as_deref(), Some("wild"));
        assert_eq!(ran(&handler, &[]).await.as_deref(), Some("wild"));
    }

    #[tokio::test]
    async fn earlier_candidates_take_precedence() {
        let handler = Handler::new("menu")
            .on("A", marker("a"))
            .on("B", marker("b"));

        assert_eq!(ran(&handler, &["B", "A"]).await.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn no_match_without_wildcard_resolves_nothing() {
        let handler = Handler::new("menu").on("A", marker("a"));
        assert!(handler.resolve(&["B"]).is_none());
    }

    #[tokio::test]
    async fn mixin_entries_never_shadow_own_entries() {
        let shared = Handler::default_state()
            .on("Help", marker("shared help"))
            .on("Exit", marker("shared exit"));
        let handler = Handler::new("quiz").on("Help", marker("quiz help")).mixin(&shared);

        assert_eq!(handler.len(), 3);
        assert_eq!(ran(&handler, &["Help"]).await.as_deref(), Some("quiz help"));
        assert_eq!(ran(&handler, &["Exit"]).await.as_deref(), Some("shared exit"));
    }

    #[test]
    fn declares_ignores_wildcard() {
        let handler = Handler::new("x").on("?", |_, _| Ok(()));
        assert!(!handler.declares("onError"));

        let handler = handler.on("onError", |_, _| Ok(()));
        assert!(handler.declares("onError"));
    }

    #[test]
    fn empty_state_name_is_default_handler() {
        assert_eq!(Handler::new("").state(), None);
        assert_eq!(Handler::new("quiz").state(), Some("quiz"));
    }
}
