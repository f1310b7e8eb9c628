//! Middleware Port - Steps that run around a turn's handler dispatch.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::context::SessionContext;
use crate::domain::foundation::HandlerError;

/// The context as middleware sees it: every step of a phase runs
/// concurrently, so access is serialized through a lock.
pub type SharedContext = Mutex<SessionContext>;

/// A step the engine runs before and after dispatching actions.
///
/// All `before` steps of a turn are started together and awaited as a
/// batch, and likewise the `after` steps. A failing step routes the turn to
/// the handler's `onError` action.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    async fn before(&self, _ctx: &SharedContext) -> Result<(), HandlerError> {
        Ok(())
    }

    async fn after(&self, _ctx: &SharedContext) -> Result<(), HandlerError> {
        Ok(())
    }
}
