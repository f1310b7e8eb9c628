//! Maps state names to their handlers.

use std::collections::HashMap;

use super::Handler;

/// All handlers of an application, keyed by state.
///
/// The handler registered without a state is the default handler; it runs
/// whenever the conversation has no state (or an empty one).
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Option<String>, Handler>,
    fallback: Handler,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under its own state, replacing any previous one.
    pub fn register(&mut self, handler: Handler) {
        let key = handler.state().map(str::to_owned);
        tracing::debug!(state = ?key, entries = handler.len(), "handler registered");
        self.handlers.insert(key, handler);
    }

    /// The handler for `state`, or an empty one when nothing is registered.
    pub fn handler_for(&self, state: Option<&str>) -> &Handler {
        let key = state.filter(|s| !s.is_empty()).map(str::to_owned);
        self.handlers.get(&key).unwrap_or(&self.fallback)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
