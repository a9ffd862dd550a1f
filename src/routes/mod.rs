//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/sessions` - Session lifecycle and transcript clearing
//! - `/api/sessions/{id}/files` - Document upload
//! - `/api/sessions/{id}/chat` - Ask a question about the current document
//! - `/api/health` - Health checks
//! - `/` - Chat page

pub mod chat;
pub mod files;
pub mod health;
pub mod sessions;
pub mod ui;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;
use crate::middleware::cors_layer;
use crate::models::AppState;
use tracing::info;

/// Create the main application router
///
/// API routes are prefixed with `/api/`; the chat page is served from `/`.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let body_limit = state.config.server.max_upload_bytes;
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    let api_router = Router::new()
        .merge(sessions::router(state.clone()))
        .merge(files::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(health::router(state));

    Router::new()
        .merge(api_router)
        .merge(ui::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::create_router;
    use crate::config::Config;
    use crate::llm::mock::MockLLMAdapter;
    use crate::models::AppState;
    use axum::body::Body;
    use axum::http::{header, Method, Request, Response};
    use std::sync::Arc;
    use tower::ServiceExt;

    pub(crate) fn test_state(llm: Arc<MockLLMAdapter>) -> AppState {
        AppState::new(Config::default(), llm).unwrap()
    }

    pub(crate) async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        json: Option<serde_json::Value>,
    ) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match json {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        create_router(state.clone()).oneshot(request).await.unwrap()
    }

    pub(crate) async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_page_served() {
        let state = test_state(Arc::new(MockLLMAdapter::replying(&[])));

        let response = send(&state, Method::GET, "/", None).await;

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Document Assistant"));
    }
}
