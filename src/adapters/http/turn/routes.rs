//! Route configuration for the turn endpoint.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{health, perform_turn, TurnAppState};

/// Creates the router serving voice-platform webhooks.
///
/// Routes:
/// - `POST /` - Run one turn; replies with the platform's response body
/// - `GET /health` - Liveness probe
pub fn turn_router() -> Router<TurnAppState> {
    Router::new()
        .route("/", post(perform_turn))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Engine;
    use crate::config::EngineConfig;
    use crate::domain::foundation::HandlerError;
    use crate::domain::handler::Handler;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let engine = Engine::new(EngineConfig::default()).register(
            Handler::default_state()
                .on("LaunchRequest", |ctx, _| {
                    ctx.say("Hello from the router.");
                    Ok(())
                })
                .on("CrashIntent", |_, _| Err(HandlerError::msg("crashed"))),
        );
        turn_router().with_state(TurnAppState::new(Arc::new(engine)))
    }

    fn alexa(request: Value) -> Body {
        Body::from(
            json!({ "version": "1.0", "session": { "sessionId": "s" }, "request": request })
                .to_string(),
        )
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn turn_router_serves_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn turn_router_renders_platform_output() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(alexa(json!({ "type": "LaunchRequest" })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["response"]["outputSpeech"]["ssml"],
            json!("<speak>Hello from the router.</speak>")
        );
    }

    #[tokio::test]
    async fn turn_router_rejects_invalid_json() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], json!("BAD_REQUEST"));
    }

    #[tokio::test]
    async fn turn_router_reports_failed_turns() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(alexa(json!({
                        "type": "IntentRequest",
                        "intent": { "name": "CrashIntent" }
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("crashed"));
    }
}
