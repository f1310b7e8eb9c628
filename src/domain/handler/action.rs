//! Units of application logic bound to action names.

use async_trait::async_trait;

use crate::config::EngineConfig;
use crate::domain::context::SessionContext;
use crate::domain::foundation::HandlerError;

/// One step of application logic.
///
/// Actions read the request and write the response through the context, and
/// move the conversation along by transitioning to another state or action.
#[async_trait]
pub trait Action: Send + Sync {
    async fn run(&self, ctx: &mut SessionContext, config: &EngineConfig)
        -> Result<(), HandlerError>;
}

/// Adapts a synchronous closure into an [`Action`].
pub(crate) struct FnAction<F>(pub(crate) F);

#[async_trait]
impl<F> Action for FnAction<F>
where
    F: Fn(&mut SessionContext, &EngineConfig) -> Result<(), HandlerError> + Send + Sync,
{
    async fn run(
        &self,
        ctx: &mut SessionContext,
        config: &EngineConfig,
    ) -> Result<(), HandlerError> {
        (self.0)(ctx, config)
    }
}
