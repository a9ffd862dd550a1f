use axum::{Router, routing::get, Json, extract::State, response::Json as ResponseJson};
use crate::models::{AppState, HealthResponse};
use tracing::warn;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> ResponseJson<HealthResponse> {
    let inference = match state.llm.health_check().await {
        Ok(true) => "reachable",
        Ok(false) => "unhealthy",
        Err(e) => {
            warn!(error = %e, "Inference server health check failed");
            "unreachable"
        }
    };

    let response = HealthResponse {
        status: if inference == "reachable" { "ok" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        model: state.llm.model().to_string(),
        inference: inference.to_string(),
        sessions: state.sessions.len().await,
    };

    Json(response)
}

#[cfg(test)]
mod tests {
    use crate::llm::mock::MockLLMAdapter;
    use crate::routes::tests::{body_json, send, test_state};
    use axum::http::{Method, StatusCode};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_reports_model() {
        let state = test_state(Arc::new(MockLLMAdapter::replying(&[])));

        let response = send(&state, Method::GET, "/api/health", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "mock-model");
        assert_eq!(body["inference"], "reachable");
        assert_eq!(body["sessions"], 0);
    }

    #[tokio::test]
    async fn test_health_counts_live_sessions() {
        let state = test_state(Arc::new(MockLLMAdapter::replying(&[])));
        state.sessions.create().await;
        let ended = state.sessions.create().await;
        state.sessions.remove(ended).await.unwrap();
        state.sessions.create().await;

        let body = body_json(send(&state, Method::GET, "/api/health", None).await).await;

        assert_eq!(body["sessions"], 2);
    }
}
