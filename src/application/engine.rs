//! Engine - Runs one conversational turn.
//!
//! A turn runs the `before` middleware, restores persisted user data unless
//! the turn was aborted, then resolves and executes actions until no further
//! transition is requested, runs the `after` middleware and persists what
//! must outlive the turn.

use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::EngineConfig;
use crate::domain::context::SessionContext;
use crate::domain::foundation::{HandlerError, TurnMetadata};
use crate::domain::handler::{Handler, HandlerRegistry, ON_ERROR};
use crate::domain::response::NormalizedResponse;
use crate::domain::speech::SharedSpeechTransform;
use crate::ports::{Middleware, SessionStore, SessionStoreError, SharedContext};

use super::errors::{TurnError, TurnFailure};

#[derive(Debug, Clone, Copy)]
enum Phase {
    Before,
    After,
}

impl Phase {
    fn error(self, middleware: &'static str, source: HandlerError) -> TurnError {
        match self {
            Phase::Before => TurnError::MiddlewareBefore { middleware, source },
            Phase::After => TurnError::MiddlewareAfter { middleware, source },
        }
    }
}

/// The turn engine of one application.
///
/// Built once at startup and shared (it is `Send + Sync`); each call to
/// [`Engine::perform`] runs an independent turn.
///
/// ```
/// use parley::application::Engine;
/// use parley::config::EngineConfig;
/// use parley::domain::foundation::TurnMetadata;
/// use parley::domain::handler::Handler;
/// use serde_json::json;
///
/// # tokio_test_block_on(async {
/// let engine = Engine::new(EngineConfig::default()).register(
///     Handler::default_state().on("LaunchRequest", |ctx, _| {
///         ctx.say("Hello.");
///         Ok(())
///     }),
/// );
///
/// let payload = json!({ "version": "1.0", "session": {}, "request": { "type": "LaunchRequest" } });
/// let response = engine.perform(payload, TurnMetadata::new()).await.unwrap();
/// assert_eq!(response.speech, vec!["Hello."]);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct Engine {
    config: EngineConfig,
    registry: HandlerRegistry,
    middleware: Vec<Arc<dyn Middleware>>,
    store: Option<Arc<dyn SessionStore>>,
    transform: Option<SharedSpeechTransform>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: HandlerRegistry::new(),
            middleware: Vec::new(),
            store: None,
            transform: None,
        }
    }

    /// Registers a handler under its state.
    pub fn register(mut self, handler: Handler) -> Self {
        self.registry.register(handler);
        self
    }

    /// Appends middleware; phases start middleware in registration order.
    pub fn use_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        tracing::debug!(middleware = middleware.name(), "middleware added");
        self.middleware.push(middleware);
        self
    }

    /// Restores user data at the start of new sessions and persists it at
    /// the end of every turn.
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Hook applied to every speech literal before markup repair.
    pub fn with_speech_transform(mut self, transform: SharedSpeechTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Runs a turn for a raw platform payload.
    pub async fn perform(
        &self,
        payload: Value,
        metadata: TurnMetadata,
    ) -> Result<NormalizedResponse, TurnFailure> {
        let ctx =
            SessionContext::from_payload(payload, metadata, self.config.default_locale.as_deref());
        self.perform_context(ctx).await
    }

    /// Runs a turn for an already built context.
    pub async fn perform_context(
        &self,
        mut ctx: SessionContext,
    ) -> Result<NormalizedResponse, TurnFailure> {
        if self.transform.is_some() {
            ctx.set_transform(self.transform.clone());
        }
        let platform = ctx.request().platform();
        tracing::debug!(
            platform = %platform,
            state = ?ctx.state(),
            action = ?ctx.action(),
            "turn started"
        );

        let (mut ctx, before) = self.run_phase(ctx, Phase::Before).await;

        // aborted turns never read the store
        if !ctx.is_aborted() {
            if let Err(error) = self.restore(&mut ctx).await {
                return Err(fail(error, ctx));
            }
        }

        let ready = before.is_ok();
        if let Err(error) = before {
            if let Err(error) = self.recover(&mut ctx, error).await {
                return Err(fail(error, ctx));
            }
        }

        if ready && !ctx.is_aborted() {
            ctx.clean();
            if let Err(error) = self.run_loop(&mut ctx, None).await {
                if let Err(error) = self.recover(&mut ctx, error).await {
                    return Err(fail(error, ctx));
                }
            }
        }

        if ready && !ctx.is_aborted() {
            let (next, after) = self.run_phase(ctx, Phase::After).await;
            ctx = next;
            if let Err(error) = after {
                if let Err(error) = self.recover(&mut ctx, error).await {
                    return Err(fail(error, ctx));
                }
            }
        }

        if !ctx.is_aborted() {
            if let Err(error) = self.persist(&ctx).await {
                return Err(fail(error.into(), ctx));
            }
        }

        tracing::info!(
            platform = %platform,
            state = ?ctx.state(),
            aborted = ctx.is_aborted(),
            errors = ctx.errors().len(),
            end_session = ctx.response().should_end_session,
            "turn completed"
        );
        Ok(ctx.into_response())
    }

    async fn restore(&self, ctx: &mut SessionContext) -> Result<(), TurnError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if !ctx.request().is_new_session() {
            return Ok(());
        }

        let user_id = ctx
            .request()
            .user_id()
            .ok_or(SessionStoreError::MissingUserId)?
            .to_owned();
        if let Some(document) = store.restore(&user_id).await? {
            tracing::debug!(has_session = document.session.is_some(), "user document restored");
            ctx.restore(document);
        }
        Ok(())
    }

    async fn persist(&self, ctx: &SessionContext) -> Result<(), SessionStoreError> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let user_id = ctx
            .request()
            .user_id()
            .ok_or(SessionStoreError::MissingUserId)?;
        let keep_session = !ctx.errors().is_empty() || !ctx.response().should_end_session;
        store
            .persist(user_id, &ctx.user_document(keep_session))
            .await
    }

    /// Starts every middleware step of `phase` together and waits for all
    /// of them. The first failure, in registration order, is reported.
    async fn run_phase(
        &self,
        ctx: SessionContext,
        phase: Phase,
    ) -> (SessionContext, Result<(), TurnError>) {
        if self.middleware.is_empty() || ctx.is_aborted() {
            return (ctx, Ok(()));
        }

        let shared: SharedContext = Mutex::new(ctx);
        let results = join_all(self.middleware.iter().map(|middleware| {
            let shared = &shared;
            async move {
                let result = match phase {
                    Phase::Before => middleware.before(shared).await,
                    Phase::After => middleware.after(shared).await,
                };
                (middleware.name(), result)
            }
        }))
        .await;
        let ctx = shared.into_inner();

        let mut first = None;
        for (name, result) in results {
            if let Err(source) = result {
                if first.is_none() {
                    first = Some(phase.error(name, source));
                } else {
                    tracing::warn!(middleware = name, error = %source, "additional middleware failure");
                }
            }
        }

        (ctx, first.map_or(Ok(()), Err))
    }

    /// Resolves and executes actions until no transition is pending.
    ///
    /// `first` overrides the action name for the first execution only.
    async fn run_loop(
        &self,
        ctx: &mut SessionContext,
        first: Option<&str>,
    ) -> Result<(), TurnError> {
        let limit = self.config.max_transitions;
        let mut override_action = first.map(str::to_owned);
        let mut executions = 0usize;

        loop {
            if ctx.is_aborted() {
                return Ok(());
            }
            if limit > 0 && executions >= limit {
                return Err(TurnError::TransitionLimitExceeded { limit });
            }
            executions += 1;

            let state = ctx.state().map(str::to_owned);
            let action = override_action
                .take()
                .or_else(|| ctx.action().map(str::to_owned));
            let candidates: Vec<&str> = action.as_deref().into_iter().collect();

            match self.registry.handler_for(state.as_deref()).resolve(&candidates) {
                Some(run) => {
                    tracing::debug!(state = ?state, action = ?action, "dispatching action");
                    run.run(ctx, &self.config)
                        .await
                        .map_err(|source| TurnError::Action {
                            state: state.clone(),
                            action: action.clone(),
                            source,
                        })?;
                }
                None => {
                    tracing::debug!(state = ?state, action = ?action, "no action resolved");
                }
            }

            if !ctx.will_transition() {
                return Ok(());
            }
            ctx.clean();
        }
    }

    /// Records `error` and, when the current handler declares `onError`,
    /// runs the loop once from there. Otherwise hands the error back.
    async fn recover(&self, ctx: &mut SessionContext, error: TurnError) -> Result<(), TurnError> {
        ctx.record_error(error.to_string());
        ctx.clean();

        let handler = self.registry.handler_for(ctx.state());
        if !error.is_recoverable() || !handler.declares(ON_ERROR) {
            return Err(error);
        }

        tracing::warn!(state = ?ctx.state(), error = %error, "recovering with onError");
        self.run_loop(ctx, Some(ON_ERROR)).await
    }
}

fn fail(error: TurnError, ctx: SessionContext) -> TurnFailure {
    tracing::error!(
        platform = %ctx.request().platform(),
        state = ?ctx.state(),
        error = %error,
        "turn failed"
    );
    TurnFailure {
        error,
        response: Box::new(ctx.into_response()),
    }
}
