// Type definitions and error kinds

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Kind of document the text was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Spreadsheet,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

impl DocumentKind {
    /// Pick the document kind from a file name's extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = std::path::Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();

        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(DocumentKind::Spreadsheet),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short machine-readable name used in JSON error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "invalid_argument",
            AppError::Network(_) => "network_error",
            AppError::Protocol(_) => "protocol_error",
            AppError::UnsupportedFile(_) => "unsupported_file",
            AppError::Extraction(_) => "extraction_failed",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedFile(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Network(_) | AppError::Protocol(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "Request rejected");
        }

        (
            status,
            Json(serde_json::json!({
                "error": self.kind(),
                "details": self.to_string(),
            })),
        )
            .into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
