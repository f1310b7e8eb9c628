//! Errors a turn can end with.

use thiserror::Error;

use crate::domain::foundation::HandlerError;
use crate::domain::response::NormalizedResponse;
use crate::ports::SessionStoreError;

/// Why a turn did not complete normally.
///
/// Middleware, action and transition-limit errors are routed to the current
/// handler's `onError` action when it declares one; persistence errors always
/// reach the caller.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("middleware '{middleware}' failed before dispatch: {source}")]
    MiddlewareBefore {
        middleware: &'static str,
        #[source]
        source: HandlerError,
    },

    #[error("action {action:?} in state {state:?} failed: {source}")]
    Action {
        state: Option<String>,
        action: Option<String>,
        #[source]
        source: HandlerError,
    },

    #[error("middleware '{middleware}' failed after dispatch: {source}")]
    MiddlewareAfter {
        middleware: &'static str,
        #[source]
        source: HandlerError,
    },

    #[error("more than {limit} action executions in one turn")]
    TransitionLimitExceeded { limit: usize },

    #[error("session store failed: {0}")]
    Persistence(#[from] SessionStoreError),
}

impl TurnError {
    /// Whether an `onError` action may handle this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TurnError::Persistence(_))
    }
}

/// A failed turn, with whatever response had been built when it failed.
#[derive(Debug, Error)]
#[error("turn failed: {error}")]
pub struct TurnFailure {
    #[source]
    pub error: TurnError,
    pub response: Box<NormalizedResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = TurnError::Action {
            state: Some("quiz".to_string()),
            action: Some("Answer".to_string()),
            source: HandlerError::msg("boom"),
        };
        let message = err.to_string();
        assert!(message.contains("quiz"));
        assert!(message.contains("Answer"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn test_persistence_is_not_recoverable() {
        assert!(!TurnError::Persistence(SessionStoreError::MissingUserId).is_recoverable());
        assert!(TurnError::TransitionLimitExceeded { limit: 3 }.is_recoverable());
    }
}
