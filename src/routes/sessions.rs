use axum::{
    Router,
    routing::{delete, get, post},
    Json,
    extract::{State, Path},
    http::StatusCode,
};
use crate::models::{AppState, CreateSessionResponse, SessionResponse};
use crate::types::AppResult;
use uuid::Uuid;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{session_id}", get(get_session).delete(end_session))
        .route("/api/sessions/{session_id}/messages", delete(clear_messages))
        .with_state(state)
}

async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    info!(%session_id, "Session started");

    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let session = state.sessions.get(session_id).await?;
    Ok(Json(SessionResponse::from(&session)))
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(session_id).await?;
    info!(%session_id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the chat transcript; the uploaded document stays in place
async fn clear_messages(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.clear_messages(session_id).await?;
    info!(%session_id, "Chat cleared");
    Ok(StatusCode::NO_CONTENT)
}
