use axum::{
    Router,
    routing::post,
    Json,
    extract::{State, Path},
};
use crate::agents::ReplyAgent;
use crate::models::{AppState, ChatMessage, ChatRequest, ChatResponse};
use crate::types::{AppError, AppResult};
use uuid::Uuid;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions/{session_id}/chat", post(post_chat))
        .with_state(state)
}

pub async fn post_chat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidRequest("message must not be empty".to_string()));
    }

    info!(%session_id, message_len = request.message.len(), "Received chat request");

    // Snapshot the context first so a concurrent upload cannot change it mid-reply
    let context = state.sessions.document_text(session_id).await?;
    state
        .sessions
        .push_message(session_id, ChatMessage::user(request.message.as_str()))
        .await?;

    let reply = ReplyAgent::answer(
        state.llm.as_ref(),
        &state.chunker,
        &request.message,
        &context,
    )
    .await?;

    state
        .sessions
        .push_message(session_id, ChatMessage::assistant(reply.text.as_str()))
        .await?;

    info!(%session_id, response_len = reply.text.len(), mode = ?reply.mode, "Chat response sent");

    Ok(Json(ChatResponse {
        text: reply.text,
        mode: reply.mode,
    }))
}
