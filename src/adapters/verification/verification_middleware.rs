//! Middleware that rejects requests failing their platform's verifier.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::{HandlerError, Platform};
use crate::domain::response::STATUS_BAD_REQUEST;
use crate::ports::{Middleware, RequestVerifier, SharedContext, SignatureMaterial};

/// Runs the verifier registered for the request's platform.
///
/// A rejected request is not an error: the turn is aborted and answered
/// with status 400, so no handler code runs for it.
#[derive(Default, Clone)]
pub struct VerificationMiddleware {
    verifiers: HashMap<Platform, Arc<dyn RequestVerifier>>,
}

impl VerificationMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifies requests from `platform` with `verifier`.
    pub fn with_verifier(mut self, platform: Platform, verifier: Arc<dyn RequestVerifier>) -> Self {
        self.verifiers.insert(platform, verifier);
        self
    }
}

#[async_trait]
impl Middleware for VerificationMiddleware {
    fn name(&self) -> &'static str {
        "verification"
    }

    async fn before(&self, ctx: &SharedContext) -> Result<(), HandlerError> {
        // read what we need, then release the lock while verifying
        let (platform, material, body) = {
            let guard = ctx.lock().await;
            let platform = guard.request().platform();
            if !self.verifiers.contains_key(&platform) {
                return Ok(());
            }
            let body = match guard.metadata().raw_body() {
                Some(raw) => raw.to_vec(),
                None => serde_json::to_vec(guard.request().raw())?,
            };
            (platform, SignatureMaterial::from_metadata(guard.metadata()), body)
        };

        let Some(verifier) = self.verifiers.get(&platform) else {
            return Ok(());
        };

        if let Err(error) = verifier.verify(&material, &body).await {
            tracing::warn!(platform = %platform, error = %error, "request verification failed");
            let mut guard = ctx.lock().await;
            guard.abort();
            guard.set_status_code(STATUS_BAD_REQUEST);
        }
        Ok(())
    }
}
