//! Maps platform-native intents to canonical action names.
//!
//! Handlers can then declare `Launch` once instead of `LaunchRequest` for
//! Alexa and `actions.intent.MAIN` for Google.

use async_trait::async_trait;

use crate::domain::foundation::{HandlerError, Platform};
use crate::ports::{Middleware, SharedContext};

pub const LAUNCH: &str = "Launch";
pub const EXIT: &str = "Exit";
pub const SESSION_ENDED: &str = "SessionEnded";

struct Alias {
    canonical: &'static str,
    alexa: &'static [&'static str],
    google: &'static [&'static str],
    cortana: &'static [&'static str],
}

const ALIASES: &[Alias] = &[
    Alias {
        canonical: LAUNCH,
        alexa: &["LaunchRequest"],
        google: &["actions.intent.MAIN"],
        cortana: &[],
    },
    Alias {
        canonical: EXIT,
        alexa: &["AMAZON.CancelIntent", "AMAZON.StopIntent"],
        google: &["actions.intent.CANCEL"],
        cortana: &[],
    },
    Alias {
        canonical: SESSION_ENDED,
        alexa: &["SessionEndedRequest"],
        google: &["actions.intent.NO_INPUT"],
        cortana: &[],
    },
];

/// The canonical action for a platform-native action name, if any.
pub fn canonical_action(action: &str, platform: Platform) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|alias| {
            let native = match platform {
                Platform::Alexa => alias.alexa,
                Platform::Google => alias.google,
                Platform::Cortana => alias.cortana,
            };
            native.contains(&action)
        })
        .map(|alias| alias.canonical)
}

/// Rewrites the turn's action to its canonical name before dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltInActions;

#[async_trait]
impl Middleware for BuiltInActions {
    fn name(&self) -> &'static str {
        "built-in-actions"
    }

    async fn before(&self, ctx: &SharedContext) -> Result<(), HandlerError> {
        let mut ctx = ctx.lock().await;
        let platform = ctx.request().platform();
        let canonical = ctx
            .action()
            .and_then(|action| canonical_action(action, platform));

        if let Some(canonical) = canonical {
            tracing::debug!(platform = %platform, action = canonical, "built-in action alias");
            ctx.set_action(Some(canonical.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::SessionContext;
    use crate::domain::foundation::TurnMetadata;
    use serde_json::json;
    use tokio::sync::Mutex;

    #[test]
    fn test_aliases_are_platform_specific() {
        assert_eq!(canonical_action("LaunchRequest", Platform::Alexa), Some(LAUNCH));
        assert_eq!(canonical_action("LaunchRequest", Platform::Google), None);
        assert_eq!(
            canonical_action("actions.intent.MAIN", Platform::Google),
            Some(LAUNCH)
        );
        assert_eq!(canonical_action("AMAZON.StopIntent", Platform::Alexa), Some(EXIT));
        assert_eq!(
            canonical_action("actions.intent.NO_INPUT", Platform::Google),
            Some(SESSION_ENDED)
        );
        assert_eq!(canonical_action("message", Platform::Cortana), None);
    }

    #[tokio::test]
    async fn test_rewrites_action_before_dispatch() {
        let payload = json!({
            "version": "1.0",
            "session": { "new": true },
            "request": { "type": "LaunchRequest" }
        });
        let ctx = Mutex::new(SessionContext::from_payload(payload, TurnMetadata::new(), None));

        BuiltInActions.before(&ctx).await.unwrap();
        let ctx = ctx.into_inner();
        assert_eq!(ctx.action(), Some(LAUNCH));
        assert_eq!(ctx.request().action(), Some("LaunchRequest"));
    }

    #[tokio::test]
    async fn test_leaves_unknown_actions_alone() {
        let payload = json!({
            "version": "1.0",
            "session": {},
            "request": { "type": "IntentRequest", "intent": { "name": "PlayIntent" } }
        });
        let ctx = Mutex::new(SessionContext::from_payload(payload, TurnMetadata::new(), None));

        BuiltInActions.before(&ctx).await.unwrap();
        assert_eq!(ctx.into_inner().action(), Some("PlayIntent"));
    }
}
