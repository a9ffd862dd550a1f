use axum::{
    Router,
    routing::post,
    Json,
    extract::{Multipart, Path, State},
};
use crate::agents::FileUploadAgent;
use crate::models::{AppState, DocumentContext, DocumentSummary, UploadResponse};
use crate::types::{AppError, AppResult};
use tokio::task::JoinError;
use uuid::Uuid;
use tracing::{info, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions/{session_id}/files", post(upload_file))
        .with_state(state)
}

/// Accept a multipart `file` field and make its text the session's document context
async fn upload_file(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    // Reject unknown sessions before reading the body
    state.sessions.get(session_id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidRequest("'file' field has no filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("Failed to read upload: {}", e)))?;

        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::InvalidRequest("missing 'file' field".to_string()))?;
    info!(%session_id, filename = %filename, size = data.len(), "File upload request received");

    state
        .sessions
        .set_upload_status(session_id, format!("Processing: {}", filename))
        .await?;

    let extract_name = filename.clone();
    let joined = tokio::task::spawn_blocking(move || {
        FileUploadAgent::process_file(&extract_name, &data)
    })
    .await;

    let summary = record_extraction(&state, session_id, &filename, joined).await?;

    Ok(Json(UploadResponse {
        status: format!("Uploaded: {}", filename),
        document: summary,
    }))
}

/// Store a successful extraction, or mark the upload failed and return the error
async fn record_extraction(
    state: &AppState,
    session_id: Uuid,
    filename: &str,
    joined: Result<AppResult<DocumentContext>, JoinError>,
) -> AppResult<DocumentSummary> {
    let extracted = joined
        .unwrap_or_else(|e| Err(AppError::Internal(format!("Extraction task failed: {}", e))));

    let document = match extracted {
        Ok(document) => document,
        Err(e) => {
            warn!(%session_id, filename = %filename, error = %e, "Upload rejected");
            state
                .sessions
                .set_upload_status(session_id, format!("Failed: {}", filename))
                .await?;
            return Err(e);
        }
    };

    let summary = DocumentSummary::from(&document);
    state.sessions.set_document(session_id, document).await?;
    Ok(summary)
}
