//! Demo webhook host: a small space-facts application served over HTTP.

use std::sync::Arc;

use parley::adapters::http::{turn_router, TurnAppState};
use parley::adapters::{
    BuiltInActions, FileSessionStore, HmacSha256Verifier, InMemorySessionStore,
    VerificationMiddleware,
};
use parley::application::Engine;
use parley::config::{AppConfig, StorageBackend};
use parley::domain::handler::Handler;
use parley::domain::response::Card;
use parley::domain::speech::SpeechNode;
use parley::ports::SessionStore;
use tracing_subscriber::EnvFilter;

const FACTS: &[&str] = &[
    "A year on Mercury is just 88 days long.",
    "Despite being farther from the Sun, Venus experiences higher temperatures than Mercury.",
    "Venus rotates counter-clockwise, possibly because of a collision in the past with an asteroid.",
];

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn handlers() -> Vec<Handler> {
    let shared = Handler::default_state()
        .on("Exit", |ctx, _| {
            ctx.say("So long.");
            Ok(())
        })
        .on("AMAZON.HelpIntent", |ctx, _| {
            ctx.say("Simply ask me for a fact, and I will give you one.")
                .ask("What would you like?");
            Ok(())
        })
        .on("onError", |ctx, _| {
            ctx.say("Sorry, something went wrong.");
            Ok(())
        });

    let facts = Handler::new("facts")
        .on("AMAZON.YesIntent", |ctx, _| {
            ctx.transition_to_action("TellMeSomething");
            Ok(())
        })
        .on("AMAZON.NoIntent", |ctx, _| {
            ctx.say("Okay, come back any time.");
            Ok(())
        })
        .on("TellMeSomething", |ctx, _| {
            let told = ctx.attr("told").and_then(|v| v.as_u64()).unwrap_or(0);
            ctx.set_attr("told", told + 1);
            ctx.say(SpeechNode::random(FACTS.iter().copied()))
                .ask("Want another one?")
                .reprompt("Should I tell you another fact?");
            Ok(())
        })
        .mixin(&shared);

    let launch = Handler::default_state()
        .on("Launch", |ctx, _| {
            ctx.say(SpeechNode::keyed([
                ("en-US", "Welcome to space facts."),
                ("en-GB", "Welcome to space facts."),
                ("de-DE", "Willkommen bei den Weltraumfakten."),
            ]))
            .card(Card::new("Space Facts", "Ask for a fact about the solar system."));
            ctx.transition_to("facts", "TellMeSomething");
            Ok(())
        })
        .on("?", |ctx, _| {
            ctx.say("I'm not sure how to help you with that.")
                .ask("Would you like a fact?");
            ctx.response_mut().state = Some("facts".to_string());
            Ok(())
        })
        .mixin(&shared);

    vec![launch, facts]
}

fn build_engine(config: &AppConfig) -> Engine {
    let mut engine = Engine::new(config.engine.clone());
    for handler in handlers() {
        engine = engine.register(handler);
    }

    if config.verification.is_enabled() {
        if let Some(secret) = config.verification.secret.clone() {
            let verifier = Arc::new(HmacSha256Verifier::new(secret));
            let mut middleware = VerificationMiddleware::new();
            for platform in config.verification.platforms() {
                middleware = middleware.with_verifier(platform, verifier.clone());
            }
            engine = engine.use_middleware(Arc::new(middleware));
        }
    }
    engine = engine.use_middleware(Arc::new(BuiltInActions));

    let store: Option<Arc<dyn SessionStore>> = match config.storage.backend {
        StorageBackend::None => None,
        StorageBackend::Memory => Some(Arc::new(InMemorySessionStore::new())),
        StorageBackend::File => config
            .storage
            .path
            .as_ref()
            .map(|path| Arc::new(FileSessionStore::new(path)) as Arc<dyn SessionStore>),
    };
    match store {
        Some(store) => engine.with_session_store(store),
        None => engine,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    let addr = config.server.socket_addr()?;
    let engine = Arc::new(build_engine(&config));
    let app = turn_router().with_state(TurnAppState::new(engine));

    tracing::info!(%addr, storage = ?config.storage.backend, "parley listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
